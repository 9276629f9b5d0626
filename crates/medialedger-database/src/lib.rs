//! # medialedger-database
//!
//! Storage for the metadata version history: the PostgreSQL connection
//! pool, idempotent schema creation guarded by a schema-version marker,
//! and the [`VersionStore`] trait with a PostgreSQL and an in-memory
//! implementation.

pub mod connection;
pub mod repositories;
pub mod schema;
pub mod store;

pub use connection::DatabasePool;
pub use repositories::{MetadataVersionRepository, SettingsRepository};
pub use store::{MemoryVersionStore, VersionStore};
