//! Versioning service: deduplicated saves, point and range queries, diffs.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use medialedger_core::config::VersioningConfig;
use medialedger_core::error::{AppError, ErrorKind};
use medialedger_core::events::MetadataEvent;
use medialedger_core::result::AppResult;
use medialedger_database::store::VersionStore;
use medialedger_entity::metadata::{
    Checksum, FieldDiff, Locale, MediaId, MetadataField, NewVersion, SaveOutcome, VersionDiff,
    VersionKey, VersionRecord,
};

use crate::events::EventBus;

/// Bounded retry of version allocation after a lost race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Base delay; attempt `n` waits `n * backoff`.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Build from configuration.
    pub fn from_config(config: &VersioningConfig) -> Self {
        Self {
            max_attempts: config.max_save_attempts.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&VersioningConfig::default())
    }
}

/// Owns the append-only metadata history.
///
/// All mutation goes through [`VersioningService::save`]; every other
/// method is read-only.
#[derive(Clone)]
pub struct VersioningService {
    /// Backing store.
    store: Arc<dyn VersionStore>,
    /// Allocation retry policy.
    retry: RetryPolicy,
    /// Optional event sink.
    events: Option<EventBus>,
}

impl std::fmt::Debug for VersioningService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersioningService")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl VersioningService {
    /// Creates a new versioning service.
    pub fn new(store: Arc<dyn VersionStore>, retry: RetryPolicy) -> Self {
        Self {
            store,
            retry,
            events: None,
        }
    }

    /// Publish events for every created version on `bus`.
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn VersionStore> {
        &self.store
    }

    /// Idempotently prepare persistent storage.
    pub async fn maybe_create_table(&self) -> AppResult<bool> {
        self.store.ensure_schema().await
    }

    /// Persist `candidate` unless it matches the active value.
    ///
    /// Returns [`SaveOutcome::Unchanged`] with the existing version number
    /// when the checksum equals the active record's; otherwise allocates
    /// `max + 1` and inserts. A lost allocation race re-reads the active
    /// record (the competing write may have stored the same value) before
    /// trying again.
    pub async fn save(&self, candidate: NewVersion) -> AppResult<SaveOutcome> {
        let outcome = self.save_unless(candidate, |_| false).await?;
        outcome.ok_or_else(|| AppError::internal("Unguarded save was refused"))
    }

    /// Like [`VersioningService::save`], but returns `None` without writing
    /// when `keep_active` holds for the active record.
    ///
    /// The guard is evaluated on every attempt against a fresh read, so a
    /// competing write that wins the version number is seen by the retry.
    pub async fn save_unless<F>(
        &self,
        candidate: NewVersion,
        keep_active: F,
    ) -> AppResult<Option<SaveOutcome>>
    where
        F: Fn(&VersionRecord) -> bool + Send + Sync,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let active = self.store.latest(&candidate.key).await?;

            if let Some(active) = &active {
                if keep_active(active) {
                    debug!(
                        key = %candidate.key,
                        version = active.version,
                        source = %active.source,
                        "Active value is protected, not writing"
                    );
                    return Ok(None);
                }
                if active.checksum == candidate.checksum {
                    debug!(
                        key = %candidate.key,
                        version = active.version,
                        "Value unchanged, skipping version"
                    );
                    return Ok(Some(SaveOutcome::Unchanged {
                        version: active.version,
                    }));
                }
            }

            let next_version = active.map(|r| r.version + 1).unwrap_or(1);

            match self.store.insert(&candidate, next_version).await {
                Ok(record) => {
                    info!(
                        media_id = %record.media_id,
                        locale = %record.locale,
                        field = %record.field,
                        source = %record.source,
                        version = record.version,
                        "Saved metadata version"
                    );
                    if let Some(bus) = &self.events {
                        bus.publish(MetadataEvent::VersionCreated {
                            media_id: record.media_id.get(),
                            locale: record.locale.to_string(),
                            field: record.field.to_string(),
                            source: record.source.to_string(),
                            version: record.version,
                        });
                    }
                    return Ok(Some(SaveOutcome::Created(record)));
                }
                Err(e) if e.is_conflict() && attempt < max_attempts => {
                    warn!(
                        key = %candidate.key,
                        version = next_version,
                        attempt,
                        "Version number taken by a concurrent writer, retrying"
                    );
                    tokio::time::sleep(self.retry.backoff * attempt).await;
                }
                Err(e) if e.is_conflict() => {
                    return Err(AppError::with_source(
                        ErrorKind::Conflict,
                        format!(
                            "Could not allocate a version for {} after {max_attempts} attempts",
                            candidate.key
                        ),
                        e,
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Validate raw boundary input and save it.
    pub async fn save_raw(
        &self,
        media_id: i64,
        locale: &str,
        field: &str,
        value: &str,
        source: &str,
    ) -> AppResult<SaveOutcome> {
        let candidate = NewVersion::parse(media_id, locale, field, value, source).inspect_err(
            |e| warn!(media_id, field, source, error = %e, "Rejected metadata version"),
        )?;
        self.save(candidate).await
    }

    /// The highest version number for the key, or 0.
    pub async fn get_latest_version_number(&self, key: &VersionKey) -> AppResult<u32> {
        self.store.latest_version_number(key).await
    }

    /// The active (highest-numbered) record.
    pub async fn get_active_version(
        &self,
        key: &VersionKey,
    ) -> AppResult<Option<VersionRecord>> {
        self.store.latest(key).await
    }

    /// Exact version lookup.
    pub async fn get_version(
        &self,
        key: &VersionKey,
        version: u32,
    ) -> AppResult<Option<VersionRecord>> {
        self.store.find_version(key, version).await
    }

    /// Full history, newest first.
    pub async fn get_version_history(
        &self,
        key: &VersionKey,
    ) -> AppResult<Vec<VersionRecord>> {
        self.store.history(key).await
    }

    /// Compare two versions of one key. `None` if either is missing.
    pub async fn compare_versions(
        &self,
        key: &VersionKey,
        version_a: u32,
        version_b: u32,
    ) -> AppResult<Option<VersionDiff>> {
        let Some(a) = self.store.find_version(key, version_a).await? else {
            return Ok(None);
        };
        let Some(b) = self.store.find_version(key, version_b).await? else {
            return Ok(None);
        };
        Ok(Some(VersionDiff::between(a, b)))
    }

    /// Latest automated vs latest manual record for every field that has
    /// history in this locale. Untouched fields are omitted.
    pub async fn get_ai_vs_manual_diff(
        &self,
        media_id: MediaId,
        locale: &Locale,
    ) -> AppResult<BTreeMap<MetadataField, FieldDiff>> {
        let rows = self.store.history_for_locale(media_id, locale).await?;

        let mut by_field: BTreeMap<MetadataField, Vec<VersionRecord>> = BTreeMap::new();
        for row in rows {
            by_field.entry(row.field).or_default().push(row);
        }

        Ok(by_field
            .into_iter()
            .filter_map(|(field, history)| {
                FieldDiff::from_history(&history).map(|d| (field, d))
            })
            .collect())
    }

    /// Whether `value` equals the active value of the key.
    pub async fn value_exists(&self, key: &VersionKey, value: &str) -> AppResult<bool> {
        let Some(active) = self.store.latest(key).await? else {
            return Ok(false);
        };
        Ok(active.checksum == Checksum::of(value))
    }

    /// Remove the whole history of a deleted media item.
    pub async fn purge_media(&self, media_id: MediaId) -> AppResult<u64> {
        let removed = self.store.purge_media(media_id).await?;
        info!(media_id = %media_id, removed, "Purged metadata history");
        if let Some(bus) = &self.events {
            bus.publish(MetadataEvent::HistoryPurged {
                media_id: media_id.get(),
                removed,
            });
        }
        Ok(removed)
    }
}
