//! Idempotent schema creation for the version history.
//!
//! The installed layout is tracked by a schema-version marker stored in
//! the settings table, so repeated start-ups skip the DDL entirely and a
//! future layout change only needs a bump of [`SCHEMA_VERSION`].

use sqlx::PgPool;
use tracing::{error, info};

use medialedger_core::error::{AppError, ErrorKind};

use crate::repositories::settings::SettingsRepository;

/// Table holding every version row.
pub const TABLE_NAME: &str = "media_metadata_versions";

/// Unique constraint enforcing one row per (media, locale, field, version).
pub const UNIQUE_VERSION_CONSTRAINT: &str = "media_metadata_versions_unique_version";

/// Layout revision written by this build.
pub const SCHEMA_VERSION: i64 = 1;

/// Settings key holding the installed layout revision.
pub const SCHEMA_VERSION_KEY: &str = "metadata_versioning_schema_version";

const CREATE_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS media_metadata_versions (
        id BIGSERIAL PRIMARY KEY,
        media_id BIGINT NOT NULL CHECK (media_id > 0),
        locale VARCHAR(16) NOT NULL DEFAULT 'en',
        field VARCHAR(20) NOT NULL
            CHECK (field IN ('title', 'alt', 'caption', 'description')),
        value TEXT NOT NULL,
        source VARCHAR(20) NOT NULL DEFAULT 'ai'
            CHECK (source IN ('ai', 'manual', 'template')),
        version INTEGER NOT NULL CHECK (version > 0),
        checksum CHAR(64) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT media_metadata_versions_unique_version
            UNIQUE (media_id, locale, field, version)
    )",
    "CREATE INDEX IF NOT EXISTS media_metadata_versions_media_locale_idx
        ON media_metadata_versions (media_id, locale)",
    "CREATE INDEX IF NOT EXISTS media_metadata_versions_media_field_idx
        ON media_metadata_versions (media_id, field)",
    "CREATE INDEX IF NOT EXISTS media_metadata_versions_source_idx
        ON media_metadata_versions (source)",
    "CREATE INDEX IF NOT EXISTS media_metadata_versions_created_idx
        ON media_metadata_versions (created_at)",
];

/// Create the version table if the installed marker is older than this
/// build. Returns whether the table is present afterwards.
pub async fn maybe_create_table(pool: &PgPool) -> Result<bool, AppError> {
    let settings = SettingsRepository::new(pool.clone());
    settings.ensure_table().await?;

    let installed = settings
        .get(SCHEMA_VERSION_KEY)
        .await?
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);

    if installed >= SCHEMA_VERSION {
        return Ok(true);
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))?;
    for statement in CREATE_STATEMENTS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to create {TABLE_NAME}: {e}"),
                    e,
                )
            })?;
    }
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit schema", e))?;

    if !table_exists(pool).await? {
        error!(table = TABLE_NAME, "Failed to create metadata versioning table");
        return Ok(false);
    }

    settings
        .set(SCHEMA_VERSION_KEY, &SCHEMA_VERSION.to_string())
        .await?;
    info!(
        table = TABLE_NAME,
        schema_version = SCHEMA_VERSION,
        "Metadata versioning table ready"
    );
    Ok(true)
}

/// Check whether the version table is visible on the search path.
pub async fn table_exists(pool: &PgPool) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
         WHERE table_schema::text = ANY (current_schemas(false)::text[]) \
         AND table_name::text = $1)",
    )
    .bind(TABLE_NAME)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to inspect schema", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_are_idempotent() {
        for statement in CREATE_STATEMENTS {
            assert!(statement.contains("IF NOT EXISTS"), "{statement}");
        }
    }

    #[test]
    fn test_constraint_name_matches_ddl() {
        assert!(CREATE_STATEMENTS[0].contains(UNIQUE_VERSION_CONSTRAINT));
    }
}
