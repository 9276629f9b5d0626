//! Host content library interface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use medialedger_core::result::AppResult;
use medialedger_entity::metadata::{MediaId, MetadataField, MetadataSource};

/// Current title and description of an attachment as stored by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentText {
    /// Attachment title.
    pub title: String,
    /// Attachment description (the post body).
    pub description: String,
}

/// What the core needs from the host content system.
#[async_trait]
pub trait MediaLibrary: Send + Sync + 'static {
    /// Whether the object is a media item. Non-media objects are ignored
    /// by every change detector.
    async fn is_media_item(&self, object_id: i64) -> AppResult<bool>;

    /// Current title and description, or `None` if the item is gone.
    async fn attachment_text(&self, media_id: MediaId) -> AppResult<Option<AttachmentText>>;

    /// Remember which source and version currently back a field.
    async fn record_source_marker(
        &self,
        media_id: MediaId,
        field: MetadataField,
        source: MetadataSource,
        version: u32,
    ) -> AppResult<()>;
}
