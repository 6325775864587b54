use tokio::sync::mpsc;

use reforger_types::{EventKind, RawLine, RawPayload};

/// Hand-off point between a reader and its family queue.
///
/// Implementations must not block: classification happens on the other
/// side of the queue.
pub trait LineSink: Send {
    fn push(&self, payload: RawPayload);
}

/// Sink that tags payloads with their family and enqueues them
#[derive(Clone, Debug)]
pub struct QueueSink {
    kind: EventKind,
    tx: mpsc::UnboundedSender<RawLine>,
}

impl QueueSink {
    pub fn new(kind: EventKind, tx: mpsc::UnboundedSender<RawLine>) -> Self {
        Self { kind, tx }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl LineSink for QueueSink {
    fn push(&self, payload: RawPayload) {
        if self
            .tx
            .send(RawLine {
                kind: self.kind,
                payload,
            })
            .is_err()
        {
            // Dispatcher already gone, only happens during shutdown
            tracing::trace!(family = %self.kind, "queue closed, dropping line");
        }
    }
}
