//! # medialedger-core
//!
//! Core crate for MediaLedger. Contains configuration schemas, domain
//! events, and the unified error system shared by the versioning store
//! and the write arbitration policy.
//!
//! This crate has **no** internal dependencies on other MediaLedger crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
