//! Metadata version repository (PostgreSQL).

use async_trait::async_trait;
use sqlx::PgPool;

use medialedger_core::error::{AppError, ErrorKind};
use medialedger_core::result::AppResult;
use medialedger_entity::metadata::{Locale, MediaId, NewVersion, VersionKey, VersionRecord};

use crate::schema::{self, UNIQUE_VERSION_CONSTRAINT};
use crate::store::VersionStore;

/// Repository for the `media_metadata_versions` table.
#[derive(Debug, Clone)]
pub struct MetadataVersionRepository {
    pool: PgPool,
}

impl MetadataVersionRepository {
    /// Create a new metadata version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_db_version(version: u32) -> AppResult<i32> {
    i32::try_from(version)
        .map_err(|_| AppError::validation(format!("Version {version} is out of range")))
}

#[async_trait]
impl VersionStore for MetadataVersionRepository {
    async fn ensure_schema(&self) -> AppResult<bool> {
        schema::maybe_create_table(&self.pool).await
    }

    async fn latest(&self, key: &VersionKey) -> AppResult<Option<VersionRecord>> {
        sqlx::query_as::<_, VersionRecord>(
            "SELECT * FROM media_metadata_versions \
             WHERE media_id = $1 AND locale = $2 AND field = $3 \
             ORDER BY version DESC LIMIT 1",
        )
        .bind(key.media_id.get())
        .bind(key.locale.as_str())
        .bind(key.field.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find active version", e))
    }

    async fn latest_version_number(&self, key: &VersionKey) -> AppResult<u32> {
        let max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(version) FROM media_metadata_versions \
             WHERE media_id = $1 AND locale = $2 AND field = $3",
        )
        .bind(key.media_id.get())
        .bind(key.locale.as_str())
        .bind(key.field.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read latest version number", e)
        })?;
        Ok(max.and_then(|v| u32::try_from(v).ok()).unwrap_or(0))
    }

    async fn find_version(
        &self,
        key: &VersionKey,
        version: u32,
    ) -> AppResult<Option<VersionRecord>> {
        let Ok(version) = i32::try_from(version) else {
            return Ok(None);
        };
        sqlx::query_as::<_, VersionRecord>(
            "SELECT * FROM media_metadata_versions \
             WHERE media_id = $1 AND locale = $2 AND field = $3 AND version = $4",
        )
        .bind(key.media_id.get())
        .bind(key.locale.as_str())
        .bind(key.field.as_str())
        .bind(version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    async fn history(&self, key: &VersionKey) -> AppResult<Vec<VersionRecord>> {
        sqlx::query_as::<_, VersionRecord>(
            "SELECT * FROM media_metadata_versions \
             WHERE media_id = $1 AND locale = $2 AND field = $3 \
             ORDER BY version DESC",
        )
        .bind(key.media_id.get())
        .bind(key.locale.as_str())
        .bind(key.field.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list versions", e))
    }

    async fn history_for_locale(
        &self,
        media_id: MediaId,
        locale: &Locale,
    ) -> AppResult<Vec<VersionRecord>> {
        sqlx::query_as::<_, VersionRecord>(
            "SELECT * FROM media_metadata_versions \
             WHERE media_id = $1 AND locale = $2 \
             ORDER BY field ASC, version DESC",
        )
        .bind(media_id.get())
        .bind(locale.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list versions for locale", e)
        })
    }

    async fn insert(&self, candidate: &NewVersion, version: u32) -> AppResult<VersionRecord> {
        sqlx::query_as::<_, VersionRecord>(
            "INSERT INTO media_metadata_versions \
             (media_id, locale, field, value, source, version, checksum, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) RETURNING *",
        )
        .bind(candidate.key.media_id.get())
        .bind(candidate.key.locale.as_str())
        .bind(candidate.key.field.as_str())
        .bind(&candidate.value)
        .bind(candidate.source.as_str())
        .bind(to_db_version(version)?)
        .bind(candidate.checksum.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some(UNIQUE_VERSION_CONSTRAINT)
                    || db_err.is_unique_violation() =>
            {
                AppError::conflict(format!(
                    "Version {version} of {} already exists",
                    candidate.key
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert version", e),
        })
    }

    async fn purge_media(&self, media_id: MediaId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM media_metadata_versions WHERE media_id = $1")
            .bind(media_id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge versions", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
