//! Domain events emitted by MediaLedger operations.
//!
//! Events are published on an optional broadcast channel so outer
//! surfaces (audit trails, admin screens, cache invalidation) can observe
//! writes without the core depending on them.

pub mod metadata;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use metadata::MetadataEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: MetadataEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(payload: MetadataEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}
