//! Metadata versioning events.

use serde::{Deserialize, Serialize};

/// Events related to versioned media metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MetadataEvent {
    /// A new version row was persisted.
    VersionCreated {
        /// The media item.
        media_id: i64,
        /// Normalized locale tag.
        locale: String,
        /// Field name.
        field: String,
        /// Origin of the value.
        source: String,
        /// The allocated version number.
        version: u32,
    },
    /// A change detector recorded a human edit.
    ManualEditRecorded {
        /// The media item.
        media_id: i64,
        /// Normalized locale tag.
        locale: String,
        /// Field name.
        field: String,
        /// The allocated version number.
        version: u32,
    },
    /// An automated write was refused because the active value is manual.
    GeneratedWriteSkipped {
        /// The media item.
        media_id: i64,
        /// Normalized locale tag.
        locale: String,
        /// Field name.
        field: String,
    },
    /// All history of a media item was purged.
    HistoryPurged {
        /// The media item.
        media_id: i64,
        /// Number of rows removed.
        removed: u64,
    },
}
