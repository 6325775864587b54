//! JSON-lines command log written by a server-side admin mod.
//!
//! Every line is one record routed on its `type` field. Records that
//! describe something a line family already reports are published as that
//! family's event; the rest become [`ServerCommandEvent`]s. Lines that are
//! not JSON, records without a `type` and unknown types are skipped.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use reforger_types::{
    ActionCategory, BaseCaptureEvent, ChannelType, ChatMessageEvent, DomainEvent, EditorAction,
    EditorActionEvent, EditorPlayer, EventKind, GameStatus, GameStatusEvent, GmStatus,
    GmStatusEvent, KillDetails, KillType, Killer, PlayerJoinedEvent, PlayerKilledEvent, RawLine,
    ServerCommand, ServerCommandEvent, control_display_name, platform_display_name,
    weapon_source_display_name,
};

use crate::classifier::EventClassifier;
use crate::families::editor_action::entity;
use crate::json::{flag, float, int, string};

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLogClassifier;

impl CommandLogClassifier {
    /// Parse one log line; `None` for anything that is not a known record
    pub fn process_line(&self, line: &str) -> Option<DomainEvent> {
        let record: Value = serde_json::from_str(line.trim()).ok()?;
        self.process_record(&record)
    }

    /// Route one record on its `type`
    pub fn process_record(&self, record: &Value) -> Option<DomainEvent> {
        let kind = record.get("type")?.as_str()?;
        let timestamp = string(record.get("timestamp")).unwrap_or_default();

        let event = match kind {
            "ChatMessageEvent" => DomainEvent::ChatMessage(chat(record, timestamp)),
            "PlayerKilledEvent" => DomainEvent::PlayerKilled(player_killed(record, timestamp)),
            "EditorActionEvent" => DomainEvent::EditorAction(editor_action(record, timestamp)),
            "PlayerConnectedEvent" => DomainEvent::PlayerJoined(connected(record, timestamp)),
            "GameStartEvent" => DomainEvent::GameStatus(GameStatusEvent {
                timestamp,
                status: GameStatus::Start,
                scenario_id: None,
                build_version: string(record.get("version")),
                end_reason: None,
                winner_faction_name: None,
                winner_faction_key: None,
            }),
            "BaseCapturedEvent" => DomainEvent::BaseCapture(BaseCaptureEvent {
                timestamp,
                faction_key: string(record.get("capturingFactionKey")),
                base_name: string(record.get("baseName")),
                faction_name: string(record.get("capturingFactionName")),
            }),
            "EnterGMEvent" => DomainEvent::GmStatus(gm(record, timestamp, GmStatus::Enter)),
            "ExitGMEvent" => DomainEvent::GmStatus(gm(record, timestamp, GmStatus::Exit)),
            other => {
                let command = command(other, record)?;
                DomainEvent::ServerCommand(ServerCommandEvent { timestamp, command })
            }
        };
        Some(event)
    }
}

impl EventClassifier for CommandLogClassifier {
    fn kind(&self) -> EventKind {
        EventKind::ServerCommand
    }

    fn test(&self, item: &RawLine) -> bool {
        item.as_text()
            .is_some_and(|line| line.starts_with('{') && line.contains("\"type\""))
    }

    fn classify(&self, item: &RawLine) -> Option<DomainEvent> {
        self.process_line(item.as_text()?)
    }
}

fn command(kind: &str, record: &Value) -> Option<ServerCommand> {
    match kind {
        "OnPlayerRegisteredEvent" => decode(record).map(ServerCommand::PlayerRegistered),
        "OnPlayerAuditSuccessEvent" => decode(record).map(ServerCommand::PlayerAuditSuccess),
        "PlayerDisconnectedEvent" => decode(record).map(ServerCommand::PlayerDisconnected),
        "CreateEntityServerEvent" => decode(record).map(ServerCommand::EntityCreated),
        "GMCreateEntityServerEvent" => decode(record).map(ServerCommand::GmEntityCreated),
        "VoteStartedEvent" => decode(record).map(ServerCommand::VoteStarted),
        "VoteEndedEvent" => decode(record).map(ServerCommand::VoteEnded),
        "SetCustomGroupNameEvent" => decode(record).map(ServerCommand::GroupNameSet),
        "SetCustomGroupDescEvent" => decode(record).map(ServerCommand::GroupDescriptionSet),
        "VehicleDecommissionEvent" => decode(record).map(ServerCommand::VehicleDecommissioned),
        "DeleteCompositionByUserActionEvent" => {
            decode(record).map(ServerCommand::CompositionDeleted)
        }
        "EditModeTeleportEvent" => decode(record).map(ServerCommand::EditModeTeleport),
        "PromotePlayerContextEvent" => decode(record).map(ServerCommand::PlayerPromoted),
        "DemotePlayerContextEvent" => decode(record).map(ServerCommand::PlayerDemoted),
        _ => None,
    }
}

/// Fields of the wrong JSON type drop the record
fn decode<T: DeserializeOwned>(record: &Value) -> Option<T> {
    T::deserialize(record).ok()
}

fn chat(r: &Value, timestamp: String) -> ChatMessageEvent {
    let channel_id = int(r.get("channelId"));
    ChatMessageEvent {
        timestamp,
        player_id: int(r.get("playerId")),
        player_name: string(r.get("playerName")),
        player_bi_id: string(r.get("playerGUID")),
        channel_id,
        channel_type: ChannelType::from_id(channel_id),
        message: string(r.get("message")),
        is_server_muted: Some(flag(r.get("isServerMuted"))),
    }
}

fn side(r: &Value, prefix: &str) -> Killer {
    let field = |suffix: &str| r.get(format!("{}{}", prefix, suffix).as_str());
    let control = string(field("Control"));
    Killer {
        id: int(field("Id")),
        name: string(field("Name")),
        bi_id: string(field("GUID")),
        faction: None,
        faction_type: None,
        control_type: control.as_deref().map(|c| control_display_name(c).to_string()),
        control,
        disguise: string(field("Disguise")),
    }
}

fn player_killed(r: &Value, timestamp: String) -> PlayerKilledEvent {
    let killer = side(r, "killer");
    let victim = side(r, "victim");
    let friendly_fire = flag(r.get("friendlyFire"));
    let team_kill = flag(r.get("teamKill"));
    let kill_type = KillType::classify(
        killer.id,
        killer.name.as_deref(),
        killer.bi_id.as_deref(),
        friendly_fire,
        team_kill,
    );
    let weapon_source = string(r.get("weaponSource"));

    PlayerKilledEvent {
        timestamp,
        killer,
        victim,
        kill: KillDetails {
            weapon: string(r.get("weapon")),
            distance: float(r.get("distance")),
            friendly_fire,
            team_kill,
            kill_type,
            weapon_source_type: weapon_source
                .as_deref()
                .map(|s| weapon_source_display_name(s).to_string()),
            weapon_source,
            instigator_type: string(r.get("instigatorType")),
        },
    }
}

/// A list field may hold an array or a single value
fn list(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => &[],
        Some(single) => std::slice::from_ref(single),
    }
}

fn editor_action(r: &Value, timestamp: String) -> EditorActionEvent {
    let action = string(r.get("action"));
    let owners = list(r.get("selectedEntityComponentsOwnerIds"));
    let selected_entities = list(r.get("selectedEntityComponentsNames"))
        .iter()
        .enumerate()
        .map(|(i, name)| entity(string(Some(name)).as_deref(), int(owners.get(i))))
        .collect();

    EditorActionEvent {
        timestamp,
        player: EditorPlayer {
            id: int(r.get("playerId")),
            name: string(r.get("playerName")),
            guid: string(r.get("playerGUID")),
        },
        action: EditorAction {
            category: action
                .as_deref()
                .map_or(ActionCategory::Other, ActionCategory::from_action),
            action_type: action,
        },
        hovered_entity: entity(
            string(r.get("hoveredEntityComponentName")).as_deref(),
            int(r.get("hoveredEntityComponentOwnerId")),
        ),
        selected_entities,
    }
}

fn connected(r: &Value, timestamp: String) -> PlayerJoinedEvent {
    let platform = string(r.get("platform"));
    PlayerJoinedEvent {
        timestamp,
        player_id: int(r.get("playerId")),
        player_name: string(r.get("playerName")),
        player_bi_id: string(r.get("playerGUID")),
        profile_name: string(r.get("profileName")),
        platform_type: platform.as_deref().map(|p| platform_display_name(p).to_string()),
        platform,
    }
}

fn gm(r: &Value, timestamp: String, status: GmStatus) -> GmStatusEvent {
    GmStatusEvent {
        timestamp,
        status,
        player_bi_id: string(r.get("adminGUID")),
        player_name: string(r.get("adminName")),
        player_id: int(r.get("adminId")),
        duration: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reforger_types::{AdminTarget, VoteEnded};
    use serde_json::json;

    fn record(value: Value) -> Option<DomainEvent> {
        CommandLogClassifier.process_line(&value.to_string())
    }

    #[test]
    fn test_chat_record_becomes_chat_event() {
        let event = record(json!({
            "type": "ChatMessageEvent",
            "timestamp": "2025-05-27T06:00:00Z",
            "playerId": 7,
            "playerName": "Bob",
            "playerGUID": "g-7",
            "channelId": 1,
            "message": "hello, all"
        }));
        let Some(DomainEvent::ChatMessage(chat)) = event else {
            panic!("chat record did not classify");
        };
        assert_eq!(chat.timestamp, "2025-05-27T06:00:00Z");
        assert_eq!(chat.player_bi_id.as_deref(), Some("g-7"));
        assert_eq!(chat.channel_type, ChannelType::Faction);
        assert_eq!(chat.message.as_deref(), Some("hello, all"));
        assert_eq!(chat.is_server_muted, Some(false));
    }

    #[test]
    fn test_kill_record_carries_controllers() {
        let event = record(json!({
            "type": "PlayerKilledEvent",
            "timestamp": "t",
            "killerId": 3,
            "killerName": "Cerberus",
            "killerGUID": "g-3",
            "killerControl": "UNLIMITED_EDITOR",
            "victimId": 9,
            "victimName": "Sully",
            "victimControl": "PLAYER",
            "friendlyFire": false,
            "teamKill": true,
            "weapon": "AK-74",
            "weaponSource": "Infantry",
            "distance": 15.25,
            "instigatorType": "PLAYER"
        }));
        let Some(DomainEvent::PlayerKilled(kill)) = event else {
            panic!("kill record did not classify");
        };
        assert_eq!(kill.killer.bi_id.as_deref(), Some("g-3"));
        assert_eq!(kill.killer.control_type.as_deref(), Some("Game Master"));
        assert_eq!(kill.victim.control_type.as_deref(), Some("Player"));
        assert_eq!(kill.kill.kill_type, KillType::TeamKill);
        assert_eq!(kill.kill.distance, Some(15.25));
        assert_eq!(kill.kill.weapon_source_type.as_deref(), Some("Infantry Weapon"));

        let json = serde_json::to_value(DomainEvent::PlayerKilled(kill)).unwrap();
        assert_eq!(json["type"], "playerKilledEvent");
        assert_eq!(json["killer"]["control"], "UNLIMITED_EDITOR");
        assert_eq!(json["kill"]["instigatorType"], "PLAYER");
    }

    #[test]
    fn test_ai_killer_by_id() {
        let event = record(json!({
            "type": "PlayerKilledEvent",
            "timestamp": "t",
            "killerId": -1,
            "killerName": "Rifleman",
            "victimId": 9
        }));
        let Some(DomainEvent::PlayerKilled(kill)) = event else {
            panic!("kill record did not classify");
        };
        assert_eq!(kill.kill.kill_type, KillType::AiKill);
        assert_eq!(kill.kill.distance, None);
    }

    #[test]
    fn test_editor_record_accepts_arrays_and_scalars() {
        let event = record(json!({
            "type": "EditorActionEvent",
            "timestamp": "t",
            "playerId": 2,
            "action": "SCR_DeleteSelectedContextAction",
            "hoveredEntityComponentName": "unknown",
            "hoveredEntityComponentOwnerId": -1,
            "selectedEntityComponentsNames": ["Truck", "Jeep"],
            "selectedEntityComponentsOwnerIds": [4]
        }));
        let Some(DomainEvent::EditorAction(action)) = event else {
            panic!("editor record did not classify");
        };
        assert_eq!(action.action.category, ActionCategory::Delete);
        assert_eq!(action.hovered_entity.name, None);
        assert_eq!(action.hovered_entity.owner_id, None);
        assert_eq!(action.selected_entities.len(), 2);
        assert_eq!(action.selected_entities[0].owner_id, Some(4));
        assert_eq!(action.selected_entities[1].name.as_deref(), Some("Jeep"));
        assert_eq!(action.selected_entities[1].owner_id, None);

        let event = record(json!({
            "type": "EditorActionEvent",
            "timestamp": "t",
            "selectedEntityComponentsNames": "Truck",
            "selectedEntityComponentsOwnerIds": 4
        }));
        let Some(DomainEvent::EditorAction(action)) = event else {
            panic!("editor record did not classify");
        };
        assert_eq!(action.selected_entities.len(), 1);
        assert_eq!(action.selected_entities[0].owner_id, Some(4));
    }

    #[test]
    fn test_records_mapped_onto_line_families() {
        let cases = [
            (json!({"type": "PlayerConnectedEvent", "platform": "platform-xbox"}), EventKind::PlayerJoined),
            (json!({"type": "GameStartEvent", "version": "1.3.0"}), EventKind::GameStatus),
            (json!({"type": "BaseCapturedEvent", "baseName": "Morton"}), EventKind::BaseCapture),
            (json!({"type": "EnterGMEvent", "adminId": 1}), EventKind::GmStatus),
            (json!({"type": "ExitGMEvent", "adminId": 1}), EventKind::GmStatus),
        ];
        for (value, kind) in cases {
            let event = record(value.clone()).unwrap_or_else(|| panic!("{} did not classify", value));
            assert_eq!(event.kind(), kind);
        }

        let Some(DomainEvent::GmStatus(exit)) = record(json!({
            "type": "ExitGMEvent",
            "timestamp": "t",
            "adminId": 1,
            "adminName": "GM",
            "adminGUID": "g-1"
        })) else {
            panic!("gm record did not classify");
        };
        assert_eq!(exit.status, GmStatus::Exit);
        assert_eq!(exit.player_bi_id.as_deref(), Some("g-1"));
        assert_eq!(exit.duration, None);
    }

    #[test]
    fn test_command_records() {
        let Some(DomainEvent::ServerCommand(event)) = record(json!({
            "type": "PromotePlayerContextEvent",
            "timestamp": "t",
            "adminId": 1,
            "adminName": "GM",
            "adminGUID": "g-1",
            "targetId": 5,
            "targetName": "Ann"
        })) else {
            panic!("promote record did not classify");
        };
        assert_eq!(event.command.name(), "promotePlayerContextEvent");
        assert_eq!(
            event.command,
            ServerCommand::PlayerPromoted(AdminTarget {
                admin_id: Some(1),
                admin_name: Some("GM".to_string()),
                admin_guid: Some("g-1".to_string()),
                target_id: Some(5),
                target_name: Some("Ann".to_string()),
                target_guid: None,
            })
        );

        let Some(DomainEvent::ServerCommand(event)) = record(json!({
            "type": "VoteEndedEvent",
            "timestamp": "t",
            "voteType": "KICK",
            "voteTarget": 5,
            "voteResult": 1
        })) else {
            panic!("vote record did not classify");
        };
        assert_eq!(
            event.command,
            ServerCommand::VoteEnded(VoteEnded {
                vote_type: Some(json!("KICK")),
                vote_target: Some(json!(5)),
                vote_result: Some(json!(1)),
            })
        );

        let Some(DomainEvent::ServerCommand(event)) = record(json!({
            "type": "SetCustomGroupNameEvent",
            "timestamp": "t",
            "playerId": 4,
            "playerName": "Ann",
            "groupName": "Hammer"
        })) else {
            panic!("group record did not classify");
        };
        let json = serde_json::to_value(DomainEvent::ServerCommand(event)).unwrap();
        assert_eq!(json["type"], "serverCommandEvent");
        assert_eq!(json["command"], "setCustomGroupNameEvent");
        assert_eq!(json["playerId"], 4);
        assert_eq!(json["groupName"], "Hammer");
    }

    #[test]
    fn test_skipped_lines() {
        assert!(CommandLogClassifier.process_line("not json").is_none());
        assert!(CommandLogClassifier.process_line("{\"type\": ").is_none());
        assert!(record(json!({"timestamp": "t"})).is_none());
        assert!(record(json!({"type": "WeatherChangedEvent"})).is_none());
        // Wrong field type
        assert!(record(json!({"type": "OnPlayerRegisteredEvent", "playerId": "x"})).is_none());
    }

    #[test]
    fn test_classifier_only_takes_json_text() {
        let line = RawLine::text(EventKind::ServerCommand, r#"{"type":"VoteEndedEvent"}"#);
        assert!(CommandLogClassifier.test(&line));
        assert!(CommandLogClassifier.classify(&line).is_some());

        let line = RawLine::text(EventKind::ServerCommand, "[t] CHAT = message=hi");
        assert!(!CommandLogClassifier.test(&line));

        let doc = RawLine::json(EventKind::ServerCommand, json!({"type": "VoteEndedEvent"}));
        assert!(!CommandLogClassifier.test(&doc));
        assert!(CommandLogClassifier.classify(&doc).is_none());
    }
}
