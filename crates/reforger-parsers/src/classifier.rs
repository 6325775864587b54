use reforger_types::{DomainEvent, EventKind, RawLine};

use crate::families;
use crate::pattern::{LinePattern, TaggedLine};

/// Turns raw items of one family into domain events.
///
/// Implementations are pure: the same item always yields the same event
/// (apart from the snapshot fallback timestamp).
pub trait EventClassifier: Send + Sync {
    fn kind(&self) -> EventKind;

    /// Cheap check whether `item` belongs to this family
    fn test(&self, item: &RawLine) -> bool;

    /// Build the event, or `None` when the item does not match
    fn classify(&self, item: &RawLine) -> Option<DomainEvent>;
}

/// Builds one event from a matched line
pub type LineBuilder = fn(&TaggedLine<'_>) -> DomainEvent;

/// Line classifier driven by an ordered list of tag patterns.
///
/// The first pattern whose tag matches a line builds the event.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    kind: EventKind,
    patterns: Vec<(LinePattern, LineBuilder)>,
}

impl PatternClassifier {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            patterns: Vec::new(),
        }
    }

    pub fn pattern(mut self, tag: &'static str, build: LineBuilder) -> Self {
        self.patterns.push((LinePattern::new(tag), build));
        self
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.patterns.iter().map(|(p, _)| p.tag())
    }

    pub fn process_line(&self, line: &str) -> Option<DomainEvent> {
        self.patterns
            .iter()
            .find_map(|(pattern, build)| pattern.captures(line).map(|tagged| build(&tagged)))
    }
}

impl EventClassifier for PatternClassifier {
    fn kind(&self) -> EventKind {
        self.kind
    }

    fn test(&self, item: &RawLine) -> bool {
        item.as_text()
            .is_some_and(|line| self.patterns.iter().any(|(p, _)| p.is_match(line)))
    }

    fn classify(&self, item: &RawLine) -> Option<DomainEvent> {
        self.process_line(item.as_text()?)
    }
}

/// Classifier for a family
pub fn classifier_for(kind: EventKind) -> Box<dyn EventClassifier> {
    match kind {
        EventKind::Chat => Box::new(families::chat::classifier()),
        EventKind::PlayerJoined => Box::new(families::player_joined::classifier()),
        EventKind::PlayerKilled => Box::new(families::player_killed::classifier()),
        EventKind::AiKilled => Box::new(families::ai_killed::classifier()),
        EventKind::EditorAction => Box::new(families::editor_action::classifier()),
        EventKind::BaseCapture => Box::new(families::base_capture::classifier()),
        EventKind::GmStatus => Box::new(families::gm_status::classifier()),
        EventKind::GameStatus => Box::new(families::game_status::classifier()),
        EventKind::Damage => Box::new(families::damage::classifier()),
        EventKind::ServerCommand => Box::new(families::server_command::CommandLogClassifier),
        EventKind::SquadList => Box::new(families::squad_list::SquadListClassifier),
    }
}
