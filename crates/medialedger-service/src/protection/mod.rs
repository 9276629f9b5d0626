//! Manual-edit protection: the write arbitration policy and the change
//! detectors that classify host edits as manual.

pub mod host;
pub mod listener;
pub mod service;

pub use host::{AttachmentText, MediaLibrary};
pub use listener::ManualEditListener;
pub use service::{ALT_TEXT_META_KEY, GatedWrite, ManualEditProtection};
