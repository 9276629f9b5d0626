//! Versioning store and arbitration configuration.

use serde::{Deserialize, Serialize};

/// Which storage backend holds the version history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via sqlx.
    Postgres,
    /// Process-local store; history is lost on exit.
    Memory,
}

/// Settings for version allocation and change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersioningConfig {
    /// Storage backend.
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    /// Locale used by change detectors when the edit context names none.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Attempts at allocating a version number before a race is surfaced.
    #[serde(default = "default_max_save_attempts")]
    pub max_save_attempts: u32,
    /// Base backoff between attempts, multiplied by the attempt number.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            default_locale: default_locale(),
            max_save_attempts: default_max_save_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_backend() -> StoreBackend {
    StoreBackend::Postgres
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_max_save_attempts() -> u32 {
    5
}

fn default_retry_backoff_ms() -> u64 {
    5
}
