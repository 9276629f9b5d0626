//! Metadata version entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use medialedger_core::AppError;

use super::checksum::Checksum;
use super::field::MetadataField;
use super::locale::Locale;
use super::media::MediaId;
use super::source::MetadataSource;

/// The history key: one gapless version sequence exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionKey {
    /// The media item.
    pub media_id: MediaId,
    /// Normalized locale.
    pub locale: Locale,
    /// Versioned field.
    pub field: MetadataField,
}

impl VersionKey {
    /// Build a key from already-validated parts.
    pub fn new(media_id: MediaId, locale: Locale, field: MetadataField) -> Self {
        Self {
            media_id,
            locale,
            field,
        }
    }

    /// Validate raw boundary input into a key.
    pub fn parse(media_id: i64, locale: &str, field: &str) -> Result<Self, AppError> {
        Ok(Self {
            media_id: MediaId::new(media_id)?,
            field: field.parse()?,
            locale: Locale::parse(locale)?,
        })
    }
}

impl std::fmt::Display for VersionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.media_id, self.locale, self.field)
    }
}

/// One immutable entry in a key's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct VersionRecord {
    /// Storage-assigned row identifier.
    pub id: i64,
    /// The media item.
    #[sqlx(try_from = "i64")]
    pub media_id: MediaId,
    /// Normalized locale.
    #[sqlx(try_from = "String")]
    pub locale: Locale,
    /// Versioned field.
    #[sqlx(try_from = "String")]
    pub field: MetadataField,
    /// The attribute text. May be empty.
    pub value: String,
    /// Origin of the value.
    #[sqlx(try_from = "String")]
    pub source: MetadataSource,
    /// 1-based sequence number within the key.
    #[sqlx(try_from = "i32")]
    pub version: u32,
    /// SHA-256 fingerprint of `value`.
    #[sqlx(try_from = "String")]
    pub checksum: Checksum,
    /// When the row was persisted. Display only; `version` is authoritative.
    pub created_at: DateTime<Utc>,
}

impl VersionRecord {
    /// The key this record belongs to.
    pub fn key(&self) -> VersionKey {
        VersionKey::new(self.media_id, self.locale.clone(), self.field)
    }

    /// Check if this record was entered by a human.
    pub fn is_manual(&self) -> bool {
        self.source.is_manual()
    }
}

/// A validated candidate value awaiting version allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVersion {
    /// Target key.
    pub key: VersionKey,
    /// Candidate value.
    pub value: String,
    /// Origin of the value.
    pub source: MetadataSource,
    /// Fingerprint of `value`.
    pub checksum: Checksum,
}

impl NewVersion {
    /// Prepare a candidate, computing its fingerprint.
    pub fn new(key: VersionKey, value: impl Into<String>, source: MetadataSource) -> Self {
        let value = value.into();
        let checksum = Checksum::of(&value);
        Self {
            key,
            value,
            source,
            checksum,
        }
    }

    /// Validate raw boundary input. Nothing is persisted on failure.
    pub fn parse(
        media_id: i64,
        locale: &str,
        field: &str,
        value: &str,
        source: &str,
    ) -> Result<Self, AppError> {
        let key = VersionKey::parse(media_id, locale, field)?;
        let source = source.parse()?;
        Ok(Self::new(key, value, source))
    }
}

/// Result of a save call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// A new row was persisted.
    Created(VersionRecord),
    /// The value matched the active record; nothing was written.
    Unchanged {
        /// The existing active version number.
        version: u32,
    },
}

impl SaveOutcome {
    /// The version number now active for the key.
    pub fn version(&self) -> u32 {
        match self {
            Self::Created(record) => record.version,
            Self::Unchanged { version } => *version,
        }
    }

    /// Whether a row was written.
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// The persisted record, if one was written.
    pub fn record(&self) -> Option<&VersionRecord> {
        match self {
            Self::Created(record) => Some(record),
            Self::Unchanged { .. } => None,
        }
    }
}
