//! Event classification for reforger-ingest
//!
//! This crate turns raw log lines and snapshot documents into typed
//! [`DomainEvent`]s. Every line family owns an ordered list of line
//! patterns; the first pattern that matches a line builds the event.

mod classifier;
mod fields;
mod json;
mod pattern;

pub mod families;

pub use classifier::{EventClassifier, PatternClassifier, classifier_for};
pub use families::server_command::CommandLogClassifier;
pub use families::squad_list::SquadListClassifier;
pub use fields::{Fields, parse_float, parse_int};
pub use pattern::{LinePattern, TaggedLine};

// Re-export types used in our public API
pub use reforger_types::{DomainEvent, EventKind, RawLine, RawPayload};
