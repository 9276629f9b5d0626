//! Versioned media metadata entities.

pub mod checksum;
pub mod diff;
pub mod field;
pub mod locale;
pub mod media;
pub mod source;
pub mod version;

pub use checksum::Checksum;
pub use diff::{FieldDiff, ValueDiff, VersionDiff};
pub use field::MetadataField;
pub use locale::Locale;
pub use media::MediaId;
pub use source::MetadataSource;
pub use version::{NewVersion, SaveOutcome, VersionKey, VersionRecord};
