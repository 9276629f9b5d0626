//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod database;
pub mod logging;
pub mod versioning;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::versioning::{StoreBackend, VersioningConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Versioning store and arbitration settings.
    #[serde(default)]
    pub versioning: VersioningConfig,
}

impl AppConfig {
    /// Load configuration for the given environment.
    ///
    /// Merges `config/default.toml` with `config/{env}.toml` and environment
    /// variables prefixed with `MEDIALEDGER__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::build(&[
            "config/default".to_string(),
            format!("config/{env}"),
        ])
    }

    /// Load configuration from an explicit file, still honouring
    /// `MEDIALEDGER__` environment overrides.
    pub fn load_from(path: &str) -> Result<Self, AppError> {
        Self::build(&[path.to_string()])
    }

    fn build(files: &[String]) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        for file in files {
            builder = builder.add_source(config::File::with_name(file).required(false));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("MEDIALEDGER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Reject settings the services cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.versioning.max_save_attempts == 0 {
            return Err(AppError::configuration(
                "versioning.max_save_attempts must be at least 1",
            ));
        }
        if self.versioning.backend == StoreBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when versioning.backend = \"postgres\"",
            ));
        }
        Ok(())
    }
}
