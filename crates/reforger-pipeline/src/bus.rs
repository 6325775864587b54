//! Fan-out of domain events to subscribers, keyed by family.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use reforger_types::{DomainEvent, EventKind};

/// Receiving end of one subscription. Closes when the bus is cleared.
pub type Subscription = mpsc::UnboundedReceiver<Arc<DomainEvent>>;

type Subscribers = HashMap<EventKind, Vec<mpsc::UnboundedSender<Arc<DomainEvent>>>>;

/// Subscriber registry shared by every dispatcher
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Subscribers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.write().entry(kind).or_default().push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber of its family.
    ///
    /// Subscribers whose receiver was dropped are pruned. Returns the
    /// number of deliveries.
    pub fn publish(&self, event: DomainEvent) -> usize {
        let kind = event.kind();
        if !self.has_subscribers(kind) {
            return 0;
        }

        let event = Arc::new(event);
        let mut subscribers = self.subscribers.write();
        let Some(senders) = subscribers.get_mut(&kind) else {
            return 0;
        };
        senders.retain(|tx| tx.send(Arc::clone(&event)).is_ok());
        senders.len()
    }

    pub fn has_subscribers(&self, kind: EventKind) -> bool {
        self.subscribers
            .read()
            .get(&kind)
            .is_some_and(|senders| !senders.is_empty())
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.read().get(&kind).map_or(0, Vec::len)
    }

    /// Drop every subscription; receivers see their channel close
    pub fn clear(&self) {
        self.subscribers.write().clear();
    }
}
