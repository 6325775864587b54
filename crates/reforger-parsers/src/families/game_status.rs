use reforger_types::{DomainEvent, EventKind, GameStatus, GameStatusEvent};

use crate::classifier::PatternClassifier;
use crate::pattern::TaggedLine;

pub const START_TAG: &str = "GAME_START";
pub const END_TAG: &str = "GAME_END";

pub fn classifier() -> PatternClassifier {
    PatternClassifier::new(EventKind::GameStatus)
        .pattern(START_TAG, |line| DomainEvent::GameStatus(parse_start(line)))
        .pattern(END_TAG, |line| DomainEvent::GameStatus(parse_end(line)))
}

pub fn parse_start(line: &TaggedLine<'_>) -> GameStatusEvent {
    let f = &line.fields;
    GameStatusEvent {
        timestamp: line.timestamp.to_string(),
        status: GameStatus::Start,
        scenario_id: f.string("scenarioId"),
        build_version: f.string("buildVersion"),
        end_reason: None,
        winner_faction_name: None,
        winner_faction_key: None,
    }
}

pub fn parse_end(line: &TaggedLine<'_>) -> GameStatusEvent {
    let f = &line.fields;
    GameStatusEvent {
        timestamp: line.timestamp.to_string(),
        status: GameStatus::End,
        scenario_id: None,
        build_version: f.string("buildVersion"),
        end_reason: f.string("endReason"),
        winner_faction_name: f.string("winnerFactionName"),
        winner_faction_key: f.string("winnerFactionKey"),
    }
}
