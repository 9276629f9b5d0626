//! Version store trait and the in-memory implementation.

pub mod memory;

use async_trait::async_trait;

use medialedger_core::result::AppResult;
use medialedger_entity::metadata::{Locale, MediaId, NewVersion, VersionKey, VersionRecord};

pub use memory::MemoryVersionStore;

/// Append-only storage of version rows.
///
/// Implementations must make `insert` atomic with respect to the version
/// number: when a row for (`key`, `version`) already exists the call fails
/// with an `ErrorKind::Conflict` error and writes nothing. Allocation of
/// the next number and deduplication are the caller's job; two
/// implementations are provided:
/// - PostgreSQL (unique constraint on the version key)
/// - In-memory (using `tokio::sync::Mutex`)
#[async_trait]
pub trait VersionStore: Send + Sync + 'static {
    /// Create the storage layout if needed. Returns whether it is usable.
    async fn ensure_schema(&self) -> AppResult<bool>;

    /// The highest-numbered record for the key.
    async fn latest(&self, key: &VersionKey) -> AppResult<Option<VersionRecord>>;

    /// The highest version number for the key, or 0 when none exists.
    async fn latest_version_number(&self, key: &VersionKey) -> AppResult<u32>;

    /// Exact lookup of one version.
    async fn find_version(&self, key: &VersionKey, version: u32)
    -> AppResult<Option<VersionRecord>>;

    /// Every record for the key, newest first.
    async fn history(&self, key: &VersionKey) -> AppResult<Vec<VersionRecord>>;

    /// Every record of a media item in one locale, grouped by field and
    /// newest first within each field.
    async fn history_for_locale(
        &self,
        media_id: MediaId,
        locale: &Locale,
    ) -> AppResult<Vec<VersionRecord>>;

    /// Persist `candidate` as `version`.
    async fn insert(&self, candidate: &NewVersion, version: u32) -> AppResult<VersionRecord>;

    /// Remove all rows of a deleted media item. Returns the number removed.
    async fn purge_media(&self, media_id: MediaId) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
