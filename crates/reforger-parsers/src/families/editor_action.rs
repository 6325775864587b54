use reforger_types::{
    ActionCategory, DomainEvent, EditorAction, EditorActionEvent, EditorEntity, EditorPlayer,
    EventKind,
};

use crate::classifier::PatternClassifier;
use crate::fields::parse_int;
use crate::pattern::TaggedLine;

pub const TAG: &str = "EDITOR_ACTION";

/// Placeholder the game writes for a missing entity name
const UNKNOWN: &str = "unknown";
/// Placeholder the game writes for a missing owner
const NO_OWNER: i64 = -1;

pub fn classifier() -> PatternClassifier {
    PatternClassifier::new(EventKind::EditorAction)
        .pattern(TAG, |line| DomainEvent::EditorAction(parse(line)))
}

pub(crate) fn entity(name: Option<&str>, owner_id: Option<i64>) -> EditorEntity {
    EditorEntity {
        name: name.filter(|n| *n != UNKNOWN).map(str::to_string),
        owner_id: owner_id.filter(|id| *id != NO_OWNER),
    }
}

/// Pair up the comma-separated name and owner lists by index
fn selected_entities(names: Option<&str>, owners: Option<&str>) -> Vec<EditorEntity> {
    let Some(names) = names.filter(|n| *n != UNKNOWN) else {
        return Vec::new();
    };
    let owners: Vec<&str> = owners.map(|o| o.split(',').collect()).unwrap_or_default();

    names
        .split(',')
        .enumerate()
        .map(|(i, name)| {
            let name = Some(name.trim()).filter(|n| !n.is_empty());
            let owner = owners.get(i).and_then(|o| parse_int(o.trim()));
            entity(name, owner)
        })
        .collect()
}

pub fn parse(line: &TaggedLine<'_>) -> EditorActionEvent {
    let f = &line.fields;
    let action = f.get("action");

    EditorActionEvent {
        timestamp: line.timestamp.to_string(),
        player: EditorPlayer {
            id: f.int("playerId"),
            name: f.string("playerName"),
            guid: f.string("playerGUID"),
        },
        action: EditorAction {
            action_type: action.map(str::to_string),
            category: action.map_or(ActionCategory::Other, ActionCategory::from_action),
        },
        hovered_entity: entity(
            f.get("hoveredEntityComponentName"),
            f.int("hoveredEntityComponentOwnerId"),
        ),
        selected_entities: selected_entities(
            f.get("selectedEntityComponentsNames"),
            f.get("selectedEntityComponentsOwnersIds"),
        ),
    }
}
