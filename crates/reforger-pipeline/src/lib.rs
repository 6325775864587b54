//! Ingestion pipeline for reforger-ingest
//!
//! Wires one reader per source file to a per-family queue, drains every
//! queue through its classifier and publishes the resulting events to
//! subscribers.
//!
//! ```no_run
//! use reforger_pipeline::{EventKind, IngestConfig, IngestionService};
//!
//! # async fn demo() {
//! let config = IngestConfig::with_log_dir("/srv/reforger/profile/logs");
//! let mut service = IngestionService::new(config);
//! let mut chat = service.subscribe(EventKind::Chat);
//! service.start().await;
//!
//! while let Some(event) = chat.recv().await {
//!     println!("{} {}", event.name(), event.timestamp());
//! }
//! service.stop().await;
//! # }
//! ```

mod bus;
mod config;
mod dispatcher;
mod error;
mod service;
mod stats;

pub use bus::{EventBus, Subscription};
pub use config::{DEFAULT_STATS_INTERVAL_MS, IngestConfig, SourceConfig};
pub use dispatcher::SourceDispatcher;
pub use error::{ConfigError, Result};
pub use service::IngestionService;
pub use stats::{FamilyStats, StatsSnapshot};

// Re-export types used in our public API
pub use reforger_types::{DomainEvent, EventKind};
