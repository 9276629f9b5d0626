//! # medialedger-service
//!
//! Business logic for MediaLedger: the versioned attribute store service,
//! the manual-edit protection policy that gates automated writers, and
//! the change-notification registry that host adapters feed.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references and there is no process-wide
//! instance.

pub mod context;
pub mod events;
pub mod hooks;
pub mod protection;
pub mod versioning;

pub use context::{BulkOperation, EditContext};
pub use events::EventBus;
pub use hooks::{ChangeListener, ChangeRegistry, FieldChange, NotifyReport};
pub use protection::{
    AttachmentText, GatedWrite, ManualEditListener, ManualEditProtection, MediaLibrary,
};
pub use versioning::{RetryPolicy, VersioningService};
