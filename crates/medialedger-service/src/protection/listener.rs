//! Adapter routing host change notifications to the manual-edit detectors.

use std::sync::Arc;

use async_trait::async_trait;

use medialedger_core::result::AppResult;

use super::service::ManualEditProtection;
use crate::context::EditContext;
use crate::hooks::{ATTACHMENT_METADATA_FIELD, ChangeListener, POST_FIELD};

/// [`ChangeListener`] that records human edits.
///
/// - [`POST_FIELD`] runs the title/description detector.
/// - [`ATTACHMENT_METADATA_FIELD`] runs the caption detector.
/// - Any other field is treated as a meta key with a string value.
#[derive(Debug, Clone)]
pub struct ManualEditListener {
    protection: Arc<ManualEditProtection>,
}

impl ManualEditListener {
    /// Creates a listener backed by `protection`.
    pub fn new(protection: Arc<ManualEditProtection>) -> Self {
        Self { protection }
    }
}

#[async_trait]
impl ChangeListener for ManualEditListener {
    fn name(&self) -> &str {
        "manual_edit_protection"
    }

    async fn on_field_changed(
        &self,
        ctx: &EditContext,
        media_id: i64,
        field: &str,
        new_value: &serde_json::Value,
    ) -> AppResult<()> {
        match field {
            POST_FIELD => {
                self.protection.detect_title_change(ctx, media_id).await?;
            }
            ATTACHMENT_METADATA_FIELD => {
                self.protection
                    .record_caption_edit(ctx, new_value, media_id)
                    .await?;
            }
            meta_key => {
                if let Some(value) = new_value.as_str() {
                    self.protection
                        .detect_alt_text_change(ctx, media_id, meta_key, value)
                        .await?;
                }
            }
        }
        Ok(())
    }
}
