use reforger_types::{ChannelType, ChatMessageEvent, DomainEvent, EventKind};

use crate::classifier::PatternClassifier;
use crate::pattern::TaggedLine;

pub const TAG: &str = "CHAT";

pub fn classifier() -> PatternClassifier {
    PatternClassifier::new(EventKind::Chat).pattern(TAG, |line| DomainEvent::ChatMessage(parse(line)))
}

pub fn parse(line: &TaggedLine<'_>) -> ChatMessageEvent {
    let f = &line.fields;
    let channel_id = f.int("channelId");
    ChatMessageEvent {
        timestamp: line.timestamp.to_string(),
        player_id: f.int("playerId"),
        player_name: f.string("playerName"),
        player_bi_id: f.string("playerBiId"),
        channel_id,
        channel_type: ChannelType::from_id(channel_id),
        message: f.string("message"),
        is_server_muted: None,
    }
}
