//! Version comparison results.

use serde::{Deserialize, Serialize};

use super::source::MetadataSource;
use super::version::VersionRecord;

/// The literal values on either side of a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDiff {
    /// Value of the first version.
    pub from: String,
    /// Value of the second version.
    pub to: String,
}

/// Comparison of two versions of the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDiff {
    /// The first requested version.
    pub version_a: VersionRecord,
    /// The second requested version.
    pub version_b: VersionRecord,
    /// True iff both checksums are equal.
    pub values_match: bool,
    /// Present only when the values differ.
    pub value_diff: Option<ValueDiff>,
    /// True iff the sources differ.
    pub source_changed: bool,
}

impl VersionDiff {
    /// Compare two records.
    pub fn between(version_a: VersionRecord, version_b: VersionRecord) -> Self {
        let values_match = version_a.checksum == version_b.checksum;
        let value_diff = (!values_match).then(|| ValueDiff {
            from: version_a.value.clone(),
            to: version_b.value.clone(),
        });
        let source_changed = version_a.source != version_b.source;
        Self {
            version_a,
            version_b,
            values_match,
            value_diff,
            source_changed,
        }
    }
}

/// Automated versus human history for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    /// The highest-numbered record.
    pub active: VersionRecord,
    /// The most recent `ai` record, if any.
    pub ai: Option<VersionRecord>,
    /// The most recent `manual` record, if any.
    pub manual: Option<VersionRecord>,
    /// Whether any manual record exists.
    pub has_manual: bool,
    /// Whether the most recent manual record is the active one.
    pub manual_is_active: bool,
}

impl FieldDiff {
    /// Summarize a newest-first history. Returns `None` for an empty history.
    pub fn from_history(history: &[VersionRecord]) -> Option<Self> {
        let active = history.iter().max_by_key(|r| r.version)?.clone();
        let latest_of = |source: MetadataSource| {
            history
                .iter()
                .filter(|r| r.source == source)
                .max_by_key(|r| r.version)
                .cloned()
        };
        let ai = latest_of(MetadataSource::Ai);
        let manual = latest_of(MetadataSource::Manual);
        let manual_is_active = manual
            .as_ref()
            .is_some_and(|m| m.version == active.version);

        Some(Self {
            has_manual: manual.is_some(),
            manual_is_active,
            active,
            ai,
            manual,
        })
    }
}
