use reforger_types::{DomainEvent, EventKind, PlayerJoinedEvent, platform_display_name};

use crate::classifier::PatternClassifier;
use crate::pattern::TaggedLine;

pub const TAG: &str = "PLAYER_JOINED";

pub fn classifier() -> PatternClassifier {
    PatternClassifier::new(EventKind::PlayerJoined)
        .pattern(TAG, |line| DomainEvent::PlayerJoined(parse(line)))
}

pub fn parse(line: &TaggedLine<'_>) -> PlayerJoinedEvent {
    let f = &line.fields;
    let platform = f.get("platform");
    PlayerJoinedEvent {
        timestamp: line.timestamp.to_string(),
        player_id: f.int("playerId"),
        player_name: f.string("playerName"),
        player_bi_id: f.string("playerBiId"),
        profile_name: f.string("profileName"),
        platform: platform.map(str::to_string),
        platform_type: platform.map(|p| platform_display_name(p).to_string()),
    }
}
