//! In-process broadcast of metadata events.

use tokio::sync::broadcast;
use tracing::trace;

use medialedger_core::events::{DomainEvent, MetadataEvent};

/// Broadcast channel for [`DomainEvent`]s.
///
/// Publishing never blocks and never fails: events sent while nobody is
/// subscribed are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event.
    pub fn publish(&self, payload: MetadataEvent) {
        let event = DomainEvent::new(payload);
        if self.tx.send(event).is_err() {
            trace!("No event subscribers");
        }
    }

    /// Subscribe to future events.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
