//! Content fingerprints.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use medialedger_core::AppError;

/// Lowercase hex SHA-256 of a value's UTF-8 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Checksum(String);

impl Checksum {
    /// Length of the hex digest.
    pub const LEN: usize = 64;

    /// Fingerprint a value.
    pub fn of(value: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Return the hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether `value` hashes to this fingerprint.
    pub fn matches(&self, value: &str) -> bool {
        *self == Self::of(value)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Checksum {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let valid = value.len() == Self::LEN
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        if !valid {
            return Err(AppError::validation(format!(
                "Invalid checksum '{value}': expected {} lowercase hex characters",
                Self::LEN
            )));
        }
        Ok(Self(value))
    }
}

impl From<Checksum> for String {
    fn from(checksum: Checksum) -> Self {
        checksum.0
    }
}
