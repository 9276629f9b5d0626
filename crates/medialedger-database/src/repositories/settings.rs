//! Key/value settings repository.

use sqlx::PgPool;

use medialedger_core::error::{AppError, ErrorKind};
use medialedger_core::result::AppResult;

/// Repository for the `medialedger_settings` key/value table.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Create a new settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the settings table if it is missing.
    pub async fn ensure_table(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS medialedger_settings (\
                key VARCHAR(191) PRIMARY KEY, \
                value TEXT NOT NULL, \
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()\
             )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create settings table", e)
        })?;
        Ok(())
    }

    /// Read a setting.
    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT value FROM medialedger_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read setting", e))
    }

    /// Insert or replace a setting.
    pub async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO medialedger_settings (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write setting", e))?;
        Ok(())
    }
}
