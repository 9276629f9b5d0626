//! Media item identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use medialedger_core::AppError;

/// Identifier of a media item in the host system. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MediaId(i64);

impl MediaId {
    /// Validate a raw host identifier.
    pub fn new(raw: i64) -> Result<Self, AppError> {
        if raw <= 0 {
            return Err(AppError::validation(format!(
                "Invalid media_id: {raw}. Media ids are positive integers"
            )));
        }
        Ok(Self(raw))
    }

    /// Return the raw identifier.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for MediaId {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MediaId> for i64 {
    fn from(id: MediaId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive() {
        assert!(MediaId::new(0).is_err());
        assert!(MediaId::new(-7).is_err());
        assert_eq!(MediaId::new(42).unwrap().get(), 42);
    }

    #[test]
    fn test_serde_validates() {
        assert!(serde_json::from_str::<MediaId>("0").is_err());
        assert_eq!(serde_json::from_str::<MediaId>("9").unwrap().get(), 9);
    }
}
