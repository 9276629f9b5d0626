//! Versioned attribute store service.

pub mod service;

pub use service::{RetryPolicy, VersioningService};
