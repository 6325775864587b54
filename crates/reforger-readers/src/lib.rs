//! File readers for reforger-ingest
//!
//! This crate provides the two polling readers that feed family queues:
//! an append-only tailer with a persisted read position, and a snapshot
//! reader that re-parses a JSON file on every tick.

mod error;
mod sink;
mod snapshot;
mod state;
mod tailer;

pub use error::{ReaderError, Result};
pub use sink::{LineSink, QueueSink};
pub use snapshot::{DEFAULT_SNAPSHOT_INTERVAL, SnapshotConfig, SnapshotFileReader};
pub use state::StateStore;
pub use tailer::{
    AppendFileTailer, CHUNK_SIZE, DEFAULT_SCAN_INTERVAL, DEFAULT_STATE_SAVE_INTERVAL,
    MAX_CHUNKS_PER_SCAN, ScanReport, TailerConfig, ticker,
};

// Re-export types used in our public API
pub use reforger_types::{EventKind, RawLine, RawPayload, TailState};
