//! Convenience result type alias for MediaLedger.

use crate::error::AppError;

/// A specialized `Result` type for MediaLedger operations.
pub type AppResult<T> = Result<T, AppError>;
