use reforger_types::{DomainEvent, EventKind, GmStatus, GmStatusEvent};

use crate::classifier::PatternClassifier;
use crate::pattern::TaggedLine;

pub const ENTER_TAG: &str = "GM_ENTER";
pub const EXIT_TAG: &str = "GM_EXIT";

pub fn classifier() -> PatternClassifier {
    PatternClassifier::new(EventKind::GmStatus)
        .pattern(ENTER_TAG, |line| DomainEvent::GmStatus(parse(line, GmStatus::Enter)))
        .pattern(EXIT_TAG, |line| DomainEvent::GmStatus(parse(line, GmStatus::Exit)))
}

pub fn parse(line: &TaggedLine<'_>, status: GmStatus) -> GmStatusEvent {
    let f = &line.fields;
    GmStatusEvent {
        timestamp: line.timestamp.to_string(),
        status,
        player_bi_id: f.string("playerBiId"),
        player_name: f.string("playerName"),
        player_id: f.int("playerId"),
        duration: match status {
            GmStatus::Enter => None,
            GmStatus::Exit => f.int("duration"),
        },
    }
}
