//! Per-family queue consumer.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use reforger_parsers::EventClassifier;
use reforger_readers::QueueSink;
use reforger_types::{EventKind, RawLine};

use crate::bus::EventBus;
use crate::stats::FamilyStats;

/// Drains one family queue in FIFO order, classifies every item and
/// publishes matches on the bus
pub struct SourceDispatcher {
    classifier: Box<dyn EventClassifier>,
    bus: EventBus,
    stats: Arc<FamilyStats>,
    rx: mpsc::UnboundedReceiver<RawLine>,
}

impl SourceDispatcher {
    /// Create the dispatcher and the sink its reader pushes into
    pub fn new(classifier: Box<dyn EventClassifier>, bus: EventBus) -> (Self, QueueSink) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = QueueSink::new(classifier.kind(), tx);
        let dispatcher = Self {
            classifier,
            bus,
            stats: Arc::new(FamilyStats::new()),
            rx,
        };
        (dispatcher, sink)
    }

    pub fn kind(&self) -> EventKind {
        self.classifier.kind()
    }

    pub fn stats(&self) -> Arc<FamilyStats> {
        Arc::clone(&self.stats)
    }

    /// Classify and publish one item. Returns whether it matched.
    pub fn handle(&self, item: &RawLine) -> bool {
        let event = if self.classifier.test(item) {
            self.classifier.classify(item)
        } else {
            None
        };

        let matched = event.is_some();
        self.stats.record(matched);

        match event {
            Some(event) => {
                let delivered = self.bus.publish(event);
                tracing::trace!(family = %self.kind(), delivered, "published event");
            }
            None => {
                tracing::trace!(family = %self.kind(), item = ?item.payload, "unmatched item");
            }
        }
        matched
    }

    /// Drain until every sink for this queue has been dropped
    pub async fn run(mut self) {
        while let Some(item) = self.rx.recv().await {
            self.handle(&item);
        }
        tracing::debug!(family = %self.kind(), "family queue drained");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
