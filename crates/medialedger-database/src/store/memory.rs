//! In-memory version store using a Tokio mutex for single-process use.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use medialedger_core::error::AppError;
use medialedger_core::result::AppResult;
use medialedger_entity::metadata::{Locale, MediaId, NewVersion, VersionKey, VersionRecord};

use super::VersionStore;

/// Internal state for the memory-based store.
#[derive(Debug, Default)]
struct InnerState {
    /// Rows per key, ascending by version.
    rows: BTreeMap<VersionKey, Vec<VersionRecord>>,
    /// Next row identifier.
    next_id: i64,
}

/// In-memory version store.
///
/// Enforces the same uniqueness rule as the PostgreSQL table, so the
/// allocation retry logic behaves identically against both. Suitable for
/// tests and single-process tooling only.
#[derive(Debug, Clone, Default)]
pub struct MemoryVersionStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryVersionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of rows across all keys.
    pub async fn row_count(&self) -> usize {
        let state = self.state.lock().await;
        state.rows.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn ensure_schema(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn latest(&self, key: &VersionKey) -> AppResult<Option<VersionRecord>> {
        let state = self.state.lock().await;
        Ok(state.rows.get(key).and_then(|rows| rows.last()).cloned())
    }

    async fn latest_version_number(&self, key: &VersionKey) -> AppResult<u32> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .get(key)
            .and_then(|rows| rows.last())
            .map(|r| r.version)
            .unwrap_or(0))
    }

    async fn find_version(
        &self,
        key: &VersionKey,
        version: u32,
    ) -> AppResult<Option<VersionRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .get(key)
            .and_then(|rows| rows.iter().find(|r| r.version == version))
            .cloned())
    }

    async fn history(&self, key: &VersionKey) -> AppResult<Vec<VersionRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .get(key)
            .map(|rows| rows.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn history_for_locale(
        &self,
        media_id: MediaId,
        locale: &Locale,
    ) -> AppResult<Vec<VersionRecord>> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .iter()
            .filter(|(key, _)| key.media_id == media_id && &key.locale == locale)
            .flat_map(|(_, rows)| rows.iter().rev().cloned())
            .collect())
    }

    async fn insert(&self, candidate: &NewVersion, version: u32) -> AppResult<VersionRecord> {
        if version == 0 {
            return Err(AppError::validation("Version numbers start at 1"));
        }

        let mut state = self.state.lock().await;
        let taken = state
            .rows
            .get(&candidate.key)
            .is_some_and(|rows| rows.iter().any(|r| r.version == version));
        if taken {
            debug!(key = %candidate.key, version, "Version number already allocated");
            return Err(AppError::conflict(format!(
                "Version {version} of {} already exists",
                candidate.key
            )));
        }

        state.next_id += 1;
        let record = VersionRecord {
            id: state.next_id,
            media_id: candidate.key.media_id,
            locale: candidate.key.locale.clone(),
            field: candidate.key.field,
            value: candidate.value.clone(),
            source: candidate.source,
            version,
            checksum: candidate.checksum.clone(),
            created_at: Utc::now(),
        };

        let rows = state.rows.entry(candidate.key.clone()).or_default();
        rows.push(record.clone());
        rows.sort_by_key(|r| r.version);
        Ok(record)
    }

    async fn purge_media(&self, media_id: MediaId) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let mut removed = 0u64;
        state.rows.retain(|key, rows| {
            if key.media_id == media_id {
                removed += rows.len() as u64;
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
