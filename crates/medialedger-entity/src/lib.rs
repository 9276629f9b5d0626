//! # medialedger-entity
//!
//! Domain entity models for MediaLedger. Every struct in this crate
//! represents a database table row or a domain value object. The closed
//! sets (`MetadataField`, `MetadataSource`) and the normalized `Locale`
//! are validated once at the boundary and carried typed afterwards.

pub mod metadata;

pub use metadata::{
    Checksum, FieldDiff, Locale, MediaId, MetadataField, MetadataSource, NewVersion, SaveOutcome,
    ValueDiff, VersionDiff, VersionKey, VersionRecord,
};
