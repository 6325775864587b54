use reforger_types::{BaseCaptureEvent, DomainEvent, EventKind};

use crate::classifier::PatternClassifier;
use crate::pattern::TaggedLine;

pub const TAG: &str = "BASE_CAPTURE";

pub fn classifier() -> PatternClassifier {
    PatternClassifier::new(EventKind::BaseCapture)
        .pattern(TAG, |line| DomainEvent::BaseCapture(parse(line)))
}

pub fn parse(line: &TaggedLine<'_>) -> BaseCaptureEvent {
    let f = &line.fields;
    BaseCaptureEvent {
        timestamp: line.timestamp.to_string(),
        faction_key: f.string("factionKey"),
        base_name: f.string("baseName"),
        faction_name: f.string("factionName"),
    }
}
