//! Typed game events published by the classifiers.
//!
//! Field names serialize in camelCase so the JSON shape matches the event
//! names consumers subscribe to.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::EventKind;

// ============================================================================
// Lookup Tables
// ============================================================================

/// Chat channel derived from the numeric channel id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ChannelType {
    Global,
    Faction,
    Group,
    Vehicle,
    Local,
    Unknown,
}

impl ChannelType {
    pub fn from_id(id: Option<i64>) -> Self {
        match id {
            Some(0) => Self::Global,
            Some(1) => Self::Faction,
            Some(2) => Self::Group,
            Some(3) => Self::Vehicle,
            Some(4) => Self::Local,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Faction => "Faction",
            Self::Group => "Group",
            Self::Vehicle => "Vehicle",
            Self::Local => "Local",
            Self::Unknown => "Unknown",
        }
    }
}

/// Classification of a player death
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum KillType {
    #[serde(rename = "Environmental Death")]
    EnvironmentalDeath,
    #[serde(rename = "Friendly AI Kill")]
    FriendlyAiKill,
    #[serde(rename = "AI Kill")]
    AiKill,
    #[serde(rename = "Friendly Fire")]
    FriendlyFire,
    #[serde(rename = "Team Kill")]
    TeamKill,
    #[serde(rename = "Player Kill")]
    PlayerKill,
}

impl KillType {
    /// Classify a kill from the killer identity and the two flags.
    ///
    /// Environment and AI killers are checked first; inside that branch a
    /// friendly-fire flag wins over the killer identity. A killer id of
    /// zero or below always means a non-player killer, whatever the name.
    pub fn classify(
        killer_id: Option<i64>,
        killer_name: Option<&str>,
        killer_bi_id: Option<&str>,
        friendly_fire: bool,
        team_kill: bool,
    ) -> Self {
        let is = |needle: &str| killer_name == Some(needle) || killer_bi_id == Some(needle);
        let environment = is("World");
        let ai = is("AI") || killer_id.is_some_and(|id| id <= 0);

        if environment || ai {
            if friendly_fire {
                Self::FriendlyAiKill
            } else if environment {
                Self::EnvironmentalDeath
            } else {
                Self::AiKill
            }
        } else if friendly_fire {
            Self::FriendlyFire
        } else if team_kill {
            Self::TeamKill
        } else {
            Self::PlayerKill
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnvironmentalDeath => "Environmental Death",
            Self::FriendlyAiKill => "Friendly AI Kill",
            Self::AiKill => "AI Kill",
            Self::FriendlyFire => "Friendly Fire",
            Self::TeamKill => "Team Kill",
            Self::PlayerKill => "Player Kill",
        }
    }
}

/// Coarse category of a game-master editor action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ActionCategory {
    Delete,
    Transform,
    Create,
    Edit,
    Selection,
    Copy,
    Paste,
    Undo,
    Redo,
    Context,
    Other,
}

impl ActionCategory {
    /// Categorise an editor action class name by keyword, first hit wins
    pub fn from_action(action: &str) -> Self {
        let has = |k: &str| action.contains(k);
        if has("Delete") {
            Self::Delete
        } else if has("Move") || has("Transform") {
            Self::Transform
        } else if has("Create") || has("Place") {
            Self::Create
        } else if has("Edit") || has("Modify") {
            Self::Edit
        } else if has("Select") {
            Self::Selection
        } else if has("Copy") || has("Duplicate") {
            Self::Copy
        } else if has("Paste") {
            Self::Paste
        } else if has("Undo") {
            Self::Undo
        } else if has("Redo") {
            Self::Redo
        } else if has("Context") {
            Self::Context
        } else {
            Self::Other
        }
    }
}

/// Display name for a faction key, passing unknown keys through
pub fn faction_display_name(key: &str) -> &str {
    match key {
        "#AR-Faction_US" => "United States",
        "#AR-Faction_USSR" => "Soviet Union",
        "#AR-Faction_FIA" => "FIA",
        "#AR-Faction_Civilian" => "Civilian",
        other => other,
    }
}

/// Display name for a platform key, passing unknown keys through
pub fn platform_display_name(key: &str) -> &str {
    match key {
        "platform-windows" => "PC (Windows)",
        "platform-xbox" => "Xbox",
        "platform-playstation" => "PlayStation",
        "platform-linux" => "PC (Linux)",
        "platform-mac" => "PC (Mac)",
        other => other,
    }
}

/// Display name for a command-log controller key, passing unknown keys
/// through
pub fn control_display_name(key: &str) -> &str {
    match key {
        "PLAYER" => "Player",
        "UNLIMITED_EDITOR" => "Game Master",
        "LIMITED_EDITOR" => "Limited Editor",
        "NONE" => "None",
        "AI" => "AI Controller",
        other => other,
    }
}

/// Display name for a command-log weapon source, passing unknown keys
/// through
pub fn weapon_source_display_name(key: &str) -> &str {
    match key {
        "Infantry" => "Infantry Weapon",
        "Vehicle" => "Vehicle Weapon",
        "Unknown" => "Unknown Source",
        other => other,
    }
}

// ============================================================================
// Line Events
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageEvent {
    pub timestamp: String,
    pub player_id: Option<i64>,
    pub player_name: Option<String>,
    pub player_bi_id: Option<String>,
    pub channel_id: Option<i64>,
    pub channel_type: ChannelType,
    pub message: Option<String>,
    /// Only reported by the server command log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_server_muted: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerJoinedEvent {
    pub timestamp: String,
    pub player_id: Option<i64>,
    pub player_name: Option<String>,
    pub player_bi_id: Option<String>,
    pub profile_name: Option<String>,
    pub platform: Option<String>,
    pub platform_type: Option<String>,
}

/// One side of a player kill. The line log reports factions, the command
/// log reports controllers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Killer {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub bi_id: Option<String>,
    pub faction: Option<String>,
    pub faction_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disguise: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KillDetails {
    pub weapon: Option<String>,
    pub distance: Option<f64>,
    pub friendly_fire: bool,
    pub team_kill: bool,
    #[serde(rename = "type")]
    pub kill_type: KillType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon_source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instigator_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerKilledEvent {
    pub timestamp: String,
    pub killer: Killer,
    pub victim: Killer,
    pub kill: KillDetails,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiKilledEvent {
    pub timestamp: String,
    pub killer_id: Option<i64>,
    pub killer_name: Option<String>,
    pub killer_bi_id: Option<String>,
    pub killer_faction: Option<String>,
    pub victim_type: Option<String>,
    pub weapon_name: Option<String>,
    pub weapon_type: Option<String>,
    pub weapon_source: Option<String>,
    pub grenade_type: Option<String>,
    pub attachments: Option<String>,
    pub sight_name: Option<String>,
    pub is_team_kill: bool,
    pub kill_distance: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EditorPlayer {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub guid: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EditorAction {
    #[serde(rename = "type")]
    pub action_type: Option<String>,
    pub category: ActionCategory,
}

/// Entity touched by an editor action; `unknown` names and owner `-1`
/// are reported as null
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorEntity {
    pub name: Option<String>,
    pub owner_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorActionEvent {
    pub timestamp: String,
    pub player: EditorPlayer,
    pub action: EditorAction,
    pub hovered_entity: EditorEntity,
    pub selected_entities: Vec<EditorEntity>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseCaptureEvent {
    pub timestamp: String,
    pub faction_key: Option<String>,
    pub base_name: Option<String>,
    pub faction_name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GmStatus {
    Enter,
    Exit,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GmStatusEvent {
    pub timestamp: String,
    pub status: GmStatus,
    pub player_bi_id: Option<String>,
    pub player_name: Option<String>,
    pub player_id: Option<i64>,
    /// Seconds spent in game-master mode, only on exit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Start,
    End,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatusEvent {
    pub timestamp: String,
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_faction_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_faction_key: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageEvent {
    pub timestamp: String,
    pub damage_type: Option<String>,
    pub damage_amount: Option<f64>,
    pub hit_zone_name: Option<String>,
    pub weapon_name: Option<String>,
    pub distance: Option<f64>,
    pub is_friendly_fire: bool,
    pub killer_id: Option<i64>,
    pub killer_name: Option<String>,
    pub killer_bi_id: Option<String>,
    pub killer_faction: Option<String>,
    pub victim_id: Option<i64>,
    pub victim_name: Option<String>,
    pub victim_bi_id: Option<String>,
    pub victim_faction: Option<String>,
}

// ============================================================================
// Squad Roster
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLeader {
    pub id: Option<i64>,
    pub name: Option<String>,
}

/// Per-group data without the member list
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub group_id: Option<i64>,
    pub group_index: Option<i64>,
    pub name: Option<String>,
    pub faction: Option<String>,
    pub radio_frequency: Option<Number>,
    pub is_private: bool,
    pub member_count: Option<i64>,
    pub max_members: Option<i64>,
    pub leader: Option<GroupLeader>,
}

/// One squad member flattened together with its group
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadPlayer {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub player_bi_id: Option<String>,
    pub platform: Option<String>,
    pub platform_type: Option<String>,
    pub rank: Option<String>,
    pub is_leader: bool,
    pub group_id: Option<i64>,
    pub group_index: Option<i64>,
    pub group_name: Option<String>,
    pub faction: Option<String>,
    pub radio_frequency: Option<Number>,
    pub is_private_group: bool,
    pub group_member_count: Option<i64>,
    pub group_max_members: Option<i64>,
    pub leader_id: Option<i64>,
    pub leader_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SquadListEvent {
    pub timestamp: String,
    /// The document's `summary` object, passed through untouched
    pub summary: Option<Value>,
    pub players: Vec<SquadPlayer>,
    pub group_summary: Vec<GroupSummary>,
}

// ============================================================================
// Server Command Log
// ============================================================================

/// Acting player as written by the command log
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPlayer {
    pub player_id: Option<i64>,
    pub player_name: Option<String>,
    #[serde(rename = "playerGUID")]
    pub player_guid: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDisconnected {
    #[serde(flatten)]
    pub player: CommandPlayer,
    pub group_name: Option<String>,
    pub reason_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCreated {
    #[serde(flatten)]
    pub player: CommandPlayer,
    pub entity_name: Option<String>,
}

/// Vote kinds and targets are game enums and ids; they pass through as
/// written
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStarted {
    #[serde(flatten)]
    pub player: CommandPlayer,
    pub vote_type: Option<Value>,
    pub vote_target: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteEnded {
    pub vote_type: Option<Value>,
    pub vote_target: Option<Value>,
    pub vote_result: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNameSet {
    #[serde(flatten)]
    pub player: CommandPlayer,
    pub group_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDescriptionSet {
    #[serde(flatten)]
    pub player: CommandPlayer,
    pub group_desc: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDecommission {
    #[serde(flatten)]
    pub player: CommandPlayer,
    pub owner_id: Option<i64>,
    pub owner_name: Option<String>,
    #[serde(rename = "ownerGUID")]
    pub owner_guid: Option<String>,
    pub is_vehicle_owner: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionDeleted {
    pub instigator_id: Option<i64>,
    pub instigator_name: Option<String>,
    #[serde(rename = "instigatorGUID")]
    pub instigator_guid: Option<String>,
    pub entity_name: Option<String>,
    pub distance: Option<f64>,
}

/// An admin acting on another player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTarget {
    pub admin_id: Option<i64>,
    pub admin_name: Option<String>,
    #[serde(rename = "adminGUID")]
    pub admin_guid: Option<String>,
    pub target_id: Option<i64>,
    pub target_name: Option<String>,
    #[serde(rename = "targetGUID")]
    pub target_guid: Option<String>,
}

/// Command-log record with no line-log counterpart, tagged with the name
/// it is known by downstream
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "command")]
pub enum ServerCommand {
    #[serde(rename = "onPlayerRegisteredEvent")]
    PlayerRegistered(CommandPlayer),
    #[serde(rename = "onPlayerAuditSuccessEvent")]
    PlayerAuditSuccess(CommandPlayer),
    #[serde(rename = "playerDisconnectedEvent")]
    PlayerDisconnected(PlayerDisconnected),
    #[serde(rename = "createEntityServerEvent")]
    EntityCreated(EntityCreated),
    #[serde(rename = "gmCreateEntityServerEvent")]
    GmEntityCreated(EntityCreated),
    #[serde(rename = "voteStartedEvent")]
    VoteStarted(VoteStarted),
    #[serde(rename = "voteEndedEvent")]
    VoteEnded(VoteEnded),
    #[serde(rename = "setCustomGroupNameEvent")]
    GroupNameSet(GroupNameSet),
    #[serde(rename = "setCustomGroupDescEvent")]
    GroupDescriptionSet(GroupDescriptionSet),
    #[serde(rename = "vehicleDecommissionEvent")]
    VehicleDecommissioned(VehicleDecommission),
    #[serde(rename = "deleteCompositionByUserActionEvent")]
    CompositionDeleted(CompositionDeleted),
    #[serde(rename = "editModeTeleportEvent")]
    EditModeTeleport(AdminTarget),
    #[serde(rename = "promotePlayerContextEvent")]
    PlayerPromoted(AdminTarget),
    #[serde(rename = "demotePlayerContextEvent")]
    PlayerDemoted(AdminTarget),
}

impl ServerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayerRegistered(_) => "onPlayerRegisteredEvent",
            Self::PlayerAuditSuccess(_) => "onPlayerAuditSuccessEvent",
            Self::PlayerDisconnected(_) => "playerDisconnectedEvent",
            Self::EntityCreated(_) => "createEntityServerEvent",
            Self::GmEntityCreated(_) => "gmCreateEntityServerEvent",
            Self::VoteStarted(_) => "voteStartedEvent",
            Self::VoteEnded(_) => "voteEndedEvent",
            Self::GroupNameSet(_) => "setCustomGroupNameEvent",
            Self::GroupDescriptionSet(_) => "setCustomGroupDescEvent",
            Self::VehicleDecommissioned(_) => "vehicleDecommissionEvent",
            Self::CompositionDeleted(_) => "deleteCompositionByUserActionEvent",
            Self::EditModeTeleport(_) => "editModeTeleportEvent",
            Self::PlayerPromoted(_) => "promotePlayerContextEvent",
            Self::PlayerDemoted(_) => "demotePlayerContextEvent",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServerCommandEvent {
    pub timestamp: String,
    #[serde(flatten)]
    pub command: ServerCommand,
}

// ============================================================================
// Domain Event
// ============================================================================

/// Canonical output of the pipeline, tagged with its event name
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    #[serde(rename = "chatMessageEvent")]
    ChatMessage(ChatMessageEvent),
    #[serde(rename = "playerJoinedEvent")]
    PlayerJoined(PlayerJoinedEvent),
    #[serde(rename = "playerKilledEvent")]
    PlayerKilled(PlayerKilledEvent),
    #[serde(rename = "aiKilledEvent")]
    AiKilled(AiKilledEvent),
    #[serde(rename = "editorActionEvent")]
    EditorAction(EditorActionEvent),
    #[serde(rename = "baseCaptureEvent")]
    BaseCapture(BaseCaptureEvent),
    #[serde(rename = "gmStatusEvent")]
    GmStatus(GmStatusEvent),
    #[serde(rename = "gameStatusEvent")]
    GameStatus(GameStatusEvent),
    #[serde(rename = "damageEvent")]
    Damage(DamageEvent),
    #[serde(rename = "serverCommandEvent")]
    ServerCommand(ServerCommandEvent),
    #[serde(rename = "squadListEvent")]
    SquadList(SquadListEvent),
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ChatMessage(_) => EventKind::Chat,
            Self::PlayerJoined(_) => EventKind::PlayerJoined,
            Self::PlayerKilled(_) => EventKind::PlayerKilled,
            Self::AiKilled(_) => EventKind::AiKilled,
            Self::EditorAction(_) => EventKind::EditorAction,
            Self::BaseCapture(_) => EventKind::BaseCapture,
            Self::GmStatus(_) => EventKind::GmStatus,
            Self::GameStatus(_) => EventKind::GameStatus,
            Self::Damage(_) => EventKind::Damage,
            Self::ServerCommand(_) => EventKind::ServerCommand,
            Self::SquadList(_) => EventKind::SquadList,
        }
    }

    /// Published event name
    pub fn name(&self) -> &'static str {
        self.kind().event_name()
    }

    /// Timestamp copied verbatim from the source
    pub fn timestamp(&self) -> &str {
        match self {
            Self::ChatMessage(e) => &e.timestamp,
            Self::PlayerJoined(e) => &e.timestamp,
            Self::PlayerKilled(e) => &e.timestamp,
            Self::AiKilled(e) => &e.timestamp,
            Self::EditorAction(e) => &e.timestamp,
            Self::BaseCapture(e) => &e.timestamp,
            Self::GmStatus(e) => &e.timestamp,
            Self::GameStatus(e) => &e.timestamp,
            Self::Damage(e) => &e.timestamp,
            Self::ServerCommand(e) => &e.timestamp,
            Self::SquadList(e) => &e.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_type_lookup() {
        assert_eq!(ChannelType::from_id(Some(0)), ChannelType::Global);
        assert_eq!(ChannelType::from_id(Some(4)), ChannelType::Local);
        assert_eq!(ChannelType::from_id(Some(9)), ChannelType::Unknown);
        assert_eq!(ChannelType::from_id(None), ChannelType::Unknown);
    }

    #[test]
    fn test_kill_type_tie_break() {
        let classify = |name: &str, ff: bool, tk: bool| {
            KillType::classify(Some(12), Some(name), Some("guid"), ff, tk)
        };
        assert_eq!(classify("World", false, false), KillType::EnvironmentalDeath);
        assert_eq!(classify("World", true, false), KillType::FriendlyAiKill);
        assert_eq!(classify("AI", false, true), KillType::AiKill);
        assert_eq!(classify("AI", true, false), KillType::FriendlyAiKill);
        assert_eq!(classify("Bob", true, true), KillType::FriendlyFire);
        assert_eq!(classify("Bob", false, true), KillType::TeamKill);
        assert_eq!(classify("Bob", false, false), KillType::PlayerKill);
    }

    #[test]
    fn test_kill_type_non_positive_killer_id_is_ai() {
        let kind = KillType::classify(Some(-1), Some("Rifleman"), None, false, false);
        assert_eq!(kind, KillType::AiKill);
        let kind = KillType::classify(Some(0), Some("Rifleman"), Some("guid"), true, true);
        assert_eq!(kind, KillType::FriendlyAiKill);
        let kind = KillType::classify(Some(1), Some("Rifleman"), Some("guid"), false, false);
        assert_eq!(kind, KillType::PlayerKill);
        let kind = KillType::classify(None, Some("Rifleman"), None, false, false);
        assert_eq!(kind, KillType::PlayerKill);
    }

    #[test]
    fn test_display_name_passthrough() {
        assert_eq!(faction_display_name("#AR-Faction_USSR"), "Soviet Union");
        assert_eq!(faction_display_name("#Custom"), "#Custom");
        assert_eq!(platform_display_name("platform-xbox"), "Xbox");
        assert_eq!(platform_display_name("platform-fridge"), "platform-fridge");
    }

    #[test]
    fn test_action_category_order() {
        assert_eq!(
            ActionCategory::from_action("SCR_DeleteSelectedContextAction"),
            ActionCategory::Delete
        );
        assert_eq!(ActionCategory::from_action("MoveEntity"), ActionCategory::Transform);
        assert_eq!(
            ActionCategory::from_action("SCR_LightningContextAction"),
            ActionCategory::Context
        );
        assert_eq!(ActionCategory::from_action("Teleport"), ActionCategory::Other);
    }

    #[test]
    fn test_domain_event_serializes_with_event_name() {
        let event = DomainEvent::BaseCapture(BaseCaptureEvent {
            timestamp: "2025-05-27 05:53:04".to_string(),
            faction_key: Some("US".to_string()),
            base_name: Some("Morton".to_string()),
            faction_name: None,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "baseCaptureEvent");
        assert_eq!(json["baseName"], "Morton");
        assert!(json["factionName"].is_null());
        assert_eq!(event.kind(), EventKind::BaseCapture);
        assert_eq!(event.timestamp(), "2025-05-27 05:53:04");
    }

    #[test]
    fn test_server_command_serializes_with_both_names() {
        let event = DomainEvent::ServerCommand(ServerCommandEvent {
            timestamp: "2025-05-27T06:00:00Z".to_string(),
            command: ServerCommand::PlayerDisconnected(PlayerDisconnected {
                player: CommandPlayer {
                    player_id: Some(4),
                    player_name: Some("Ann".to_string()),
                    player_guid: None,
                },
                group_name: Some("Alpha".to_string()),
                reason_name: Some("KICK".to_string()),
            }),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "serverCommandEvent");
        assert_eq!(json["command"], "playerDisconnectedEvent");
        assert_eq!(json["playerId"], 4);
        assert!(json["playerGUID"].is_null());
        assert_eq!(json["reasonName"], "KICK");
        assert_eq!(event.kind(), EventKind::ServerCommand);
    }

    #[test]
    fn test_command_lookup_passthrough() {
        assert_eq!(control_display_name("UNLIMITED_EDITOR"), "Game Master");
        assert_eq!(control_display_name("REMOTE"), "REMOTE");
        assert_eq!(weapon_source_display_name("Vehicle"), "Vehicle Weapon");
    }

    #[test]
    fn test_kill_type_serializes_as_display_string() {
        let json = serde_json::to_value(KillType::FriendlyAiKill).unwrap();
        assert_eq!(json, "Friendly AI Kill");
    }
}
