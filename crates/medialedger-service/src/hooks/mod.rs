//! Change-notification interface between the host and the core.
//!
//! The host translates its own edit notifications into [`FieldChange`]
//! values and hands them to a [`ChangeRegistry`], which fans them out to
//! every registered [`ChangeListener`] in priority order.

pub mod registry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use medialedger_core::result::AppResult;

use crate::context::EditContext;

pub use registry::{ChangeRegistry, NotifyReport};

/// Host field name for "the post record itself changed" (title, content).
pub const POST_FIELD: &str = "post";

/// Host field name for the attachment's structured metadata payload.
pub const ATTACHMENT_METADATA_FIELD: &str = "attachment_metadata";

/// One edit notification from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Object the change applies to.
    pub media_id: i64,
    /// Host-side field name: [`POST_FIELD`], [`ATTACHMENT_METADATA_FIELD`]
    /// or a meta key.
    pub field: String,
    /// The new value as the host reported it.
    pub value: serde_json::Value,
}

impl FieldChange {
    /// The post record was saved.
    pub fn post(media_id: i64) -> Self {
        Self {
            media_id,
            field: POST_FIELD.to_string(),
            value: serde_json::Value::Null,
        }
    }

    /// A meta entry was written.
    pub fn meta(object_id: i64, meta_key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            media_id: object_id,
            field: meta_key.into(),
            value: serde_json::Value::String(value.into()),
        }
    }

    /// The attachment metadata payload was updated.
    pub fn attachment_metadata(media_id: i64, data: serde_json::Value) -> Self {
        Self {
            media_id,
            field: ATTACHMENT_METADATA_FIELD.to_string(),
            value: data,
        }
    }
}

/// Receiver of host edit notifications.
#[async_trait]
pub trait ChangeListener: Send + Sync + std::fmt::Debug {
    /// Identifier used for registration and logs.
    fn name(&self) -> &str;

    /// Returns the priority (lower = runs first).
    fn priority(&self) -> i32 {
        100
    }

    /// Handle one change.
    async fn on_field_changed(
        &self,
        ctx: &EditContext,
        media_id: i64,
        field: &str,
        new_value: &serde_json::Value,
    ) -> AppResult<()>;
}
