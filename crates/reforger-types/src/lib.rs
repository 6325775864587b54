//! Shared types for reforger-ingest
//!
//! This crate contains the event model published by the ingestion
//! pipeline, the raw items that travel through family queues and the
//! persisted tail recovery record.

mod events;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use events::{
    ActionCategory, AiKilledEvent, BaseCaptureEvent, ChannelType, ChatMessageEvent, DamageEvent,
    DomainEvent, EditorAction, EditorActionEvent, EditorEntity, EditorPlayer, GameStatus,
    GameStatusEvent, GmStatus, GmStatusEvent, GroupLeader, GroupSummary, KillDetails, KillType,
    Killer, PlayerJoinedEvent, PlayerKilledEvent, SquadListEvent, SquadPlayer,
    faction_display_name, platform_display_name,
};
pub use events::{
    AdminTarget, CommandPlayer, CompositionDeleted, EntityCreated, GroupDescriptionSet,
    GroupNameSet, PlayerDisconnected, ServerCommand, ServerCommandEvent, VehicleDecommission,
    VoteEnded, VoteStarted, control_display_name, weapon_source_display_name,
};

// ============================================================================
// Event Families
// ============================================================================

/// Logical event family. Each family has one source file, one queue and
/// one classifier, and publishes exactly one event name.
///
/// The server command log is the exception: records it shares with a line
/// family are published under that family's event name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Chat,
    PlayerJoined,
    PlayerKilled,
    AiKilled,
    EditorAction,
    BaseCapture,
    GmStatus,
    GameStatus,
    Damage,
    ServerCommand,
    SquadList,
}

impl EventKind {
    /// Every family, in the order sources are started
    pub const ALL: [EventKind; 11] = [
        Self::Chat,
        Self::PlayerJoined,
        Self::PlayerKilled,
        Self::AiKilled,
        Self::EditorAction,
        Self::BaseCapture,
        Self::GmStatus,
        Self::GameStatus,
        Self::Damage,
        Self::ServerCommand,
        Self::SquadList,
    ];

    /// Short family name used in config files and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::PlayerJoined => "player_joined",
            Self::PlayerKilled => "player_killed",
            Self::AiKilled => "ai_killed",
            Self::EditorAction => "editor_action",
            Self::BaseCapture => "base_capture",
            Self::GmStatus => "gm_status",
            Self::GameStatus => "game_status",
            Self::Damage => "damage",
            Self::ServerCommand => "server_command",
            Self::SquadList => "squad_list",
        }
    }

    /// Subscription key exposed to consumers
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Chat => "chatMessageEvent",
            Self::PlayerJoined => "playerJoinedEvent",
            Self::PlayerKilled => "playerKilledEvent",
            Self::AiKilled => "aiKilledEvent",
            Self::EditorAction => "editorActionEvent",
            Self::BaseCapture => "baseCaptureEvent",
            Self::GmStatus => "gmStatusEvent",
            Self::GameStatus => "gameStatusEvent",
            Self::Damage => "damageEvent",
            Self::ServerCommand => "serverCommandEvent",
            Self::SquadList => "squadListEvent",
        }
    }

    /// Look up a family by its published event name
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.event_name() == name)
    }

    /// Whether this family is fed by whole-file JSON snapshots instead of
    /// appended lines
    pub fn is_snapshot(&self) -> bool {
        matches!(self, Self::SquadList)
    }

    /// Default source file written by the game server for this family
    pub fn default_filename(&self) -> &'static str {
        match self {
            Self::Chat => "chatEvents.log",
            Self::PlayerJoined => "playerJoinedEvents.log",
            Self::PlayerKilled => "playerKilledEvents.log",
            Self::AiKilled => "aiKilledEvents.log",
            Self::EditorAction => "editorActionEvents.log",
            Self::BaseCapture => "baseCaptureEvents.log",
            Self::GmStatus => "gmStatusEvents.log",
            Self::GameStatus => "gameStatusEvents.log",
            Self::Damage => "damageEvents.log",
            Self::ServerCommand => "serverCommands.jsonl",
            Self::SquadList => "squadList.json",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a family or event name is not recognised
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown event kind '{0}'")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    /// Accepts either the family name (`chat`) or the event name
    /// (`chatMessageEvent`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.event_name() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

// ============================================================================
// Queue Items
// ============================================================================

/// Payload read from a source file
#[derive(Clone, Debug, PartialEq)]
pub enum RawPayload {
    /// A trimmed, non-empty line from an append-only log
    Text(String),
    /// A whole JSON document from a snapshot file
    Json(serde_json::Value),
}

/// One item waiting in a family queue
#[derive(Clone, Debug, PartialEq)]
pub struct RawLine {
    pub kind: EventKind,
    pub payload: RawPayload,
}

impl RawLine {
    pub fn text(kind: EventKind, line: impl Into<String>) -> Self {
        Self {
            kind,
            payload: RawPayload::Text(line.into()),
        }
    }

    pub fn json(kind: EventKind, value: serde_json::Value) -> Self {
        Self {
            kind,
            payload: RawPayload::Json(value),
        }
    }

    /// The line text, if this item came from an append-only log
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            RawPayload::Text(s) => Some(s),
            RawPayload::Json(_) => None,
        }
    }

    /// The document, if this item came from a snapshot file
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match &self.payload {
            RawPayload::Json(v) => Some(v),
            RawPayload::Text(_) => None,
        }
    }
}

// ============================================================================
// Tail Recovery Record
// ============================================================================

/// Persisted read position of one append-only source.
///
/// Serialized as `{ "filePath", "lastFileSize", "buffer" }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailState {
    /// Path of the tailed file
    #[serde(rename = "filePath", default)]
    pub path: String,

    /// Byte offset up to which the file has been consumed
    #[serde(rename = "lastFileSize", default)]
    pub last_offset: u64,

    /// Trailing incomplete line carried into the next read
    #[serde(rename = "buffer", default)]
    pub carry_over: String,
}

impl TailState {
    /// Fresh state for a file that has never been read
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            last_offset: 0,
            carry_over: String::new(),
        }
    }
}
