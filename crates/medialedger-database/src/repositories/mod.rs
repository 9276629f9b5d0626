//! PostgreSQL repository implementations.

pub mod metadata_version;
pub mod settings;

pub use metadata_version::MetadataVersionRepository;
pub use settings::SettingsRepository;
