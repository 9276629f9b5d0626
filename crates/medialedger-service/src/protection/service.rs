//! Manual-edit protection service.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use medialedger_core::events::MetadataEvent;
use medialedger_core::result::AppResult;
use medialedger_entity::metadata::{
    Locale, MediaId, MetadataField, MetadataSource, NewVersion, SaveOutcome, VersionKey,
    VersionRecord,
};

use super::host::MediaLibrary;
use crate::context::EditContext;
use crate::events::EventBus;
use crate::versioning::VersioningService;

/// Default meta key under which the host stores alternate text.
pub const ALT_TEXT_META_KEY: &str = "image_alt";

/// Result of a gated automated write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GatedWrite {
    /// The policy allowed the write; carries the save outcome.
    Written(SaveOutcome),
    /// The active value is manual and the write was not forced.
    Skipped,
}

impl GatedWrite {
    /// Whether the policy refused the write.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}

/// Arbitrates between automated and human writers.
///
/// The rule is "manual edits win": once the active value of a field was
/// entered by a person, automated writers leave it alone unless the
/// caller explicitly forces a replacement.
pub struct ManualEditProtection {
    versioning: Arc<VersioningService>,
    library: Arc<dyn MediaLibrary>,
    default_locale: Locale,
    alt_meta_key: String,
    events: Option<EventBus>,
}

impl std::fmt::Debug for ManualEditProtection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualEditProtection")
            .field("default_locale", &self.default_locale)
            .field("alt_meta_key", &self.alt_meta_key)
            .finish_non_exhaustive()
    }
}

impl ManualEditProtection {
    /// Creates a new protection service.
    pub fn new(
        versioning: Arc<VersioningService>,
        library: Arc<dyn MediaLibrary>,
        default_locale: Locale,
    ) -> Self {
        Self {
            versioning,
            library,
            default_locale,
            alt_meta_key: ALT_TEXT_META_KEY.to_string(),
            events: None,
        }
    }

    /// Use a host-specific meta key for alternate text.
    pub fn with_alt_meta_key(mut self, key: impl Into<String>) -> Self {
        self.alt_meta_key = key.into();
        self
    }

    /// Publish manual-edit and skip events on `bus`.
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// The locale used when an edit context carries none.
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Whether the active value of the field was entered by a person.
    pub async fn has_manual_edit(
        &self,
        media_id: MediaId,
        field: MetadataField,
        locale: &Locale,
    ) -> AppResult<bool> {
        let key = VersionKey::new(media_id, locale.clone(), field);
        Ok(self
            .versioning
            .get_active_version(&key)
            .await?
            .is_some_and(|r| r.is_manual()))
    }

    /// Whether an automated writer may overwrite the field.
    pub async fn can_ai_write(
        &self,
        media_id: MediaId,
        field: MetadataField,
        locale: &Locale,
        force_replace: bool,
    ) -> AppResult<bool> {
        if force_replace {
            return Ok(true);
        }
        Ok(!self.has_manual_edit(media_id, field, locale).await?)
    }

    /// Save a generated value if the policy allows it.
    ///
    /// Without `force_replace` the manual check runs inside the save loop,
    /// so a manual value that lands while the generated one is being
    /// written still wins.
    pub async fn write_generated(
        &self,
        media_id: MediaId,
        field: MetadataField,
        locale: &Locale,
        value: &str,
        force_replace: bool,
    ) -> AppResult<GatedWrite> {
        let key = VersionKey::new(media_id, locale.clone(), field);
        let candidate = NewVersion::new(key, value, MetadataSource::Ai);

        if force_replace {
            let outcome = self.versioning.save(candidate).await?;
            return Ok(GatedWrite::Written(outcome));
        }

        match self
            .versioning
            .save_unless(candidate, VersionRecord::is_manual)
            .await?
        {
            Some(outcome) => Ok(GatedWrite::Written(outcome)),
            None => {
                info!(
                    media_id = %media_id,
                    locale = %locale,
                    field = %field,
                    "Manual value is active, skipping generated write"
                );
                if let Some(bus) = &self.events {
                    bus.publish(MetadataEvent::GeneratedWriteSkipped {
                        media_id: media_id.get(),
                        locale: locale.to_string(),
                        field: field.to_string(),
                    });
                }
                Ok(GatedWrite::Skipped)
            }
        }
    }

    /// Record the current title and description of an edited post.
    pub async fn detect_title_change(
        &self,
        ctx: &EditContext,
        object_id: i64,
    ) -> AppResult<Vec<VersionRecord>> {
        let Some(media_id) = self.media_target(ctx, object_id).await? else {
            return Ok(Vec::new());
        };
        let Some(text) = self.library.attachment_text(media_id).await? else {
            debug!(media_id = %media_id, "Attachment text unavailable");
            return Ok(Vec::new());
        };

        let mut saved = Vec::new();
        for (field, value) in [
            (MetadataField::Title, text.title.as_str()),
            (MetadataField::Description, text.description.as_str()),
        ] {
            if let Some(record) = self
                .maybe_save_manual_version(ctx, media_id, field, value)
                .await?
            {
                saved.push(record);
            }
        }
        Ok(saved)
    }

    /// Record a human change of alternate text.
    pub async fn detect_alt_text_change(
        &self,
        ctx: &EditContext,
        object_id: i64,
        meta_key: &str,
        new_value: &str,
    ) -> AppResult<Option<VersionRecord>> {
        if meta_key != self.alt_meta_key {
            return Ok(None);
        }
        let Some(media_id) = self.media_target(ctx, object_id).await? else {
            return Ok(None);
        };
        self.maybe_save_manual_version(ctx, media_id, MetadataField::Alt, new_value)
            .await
    }

    /// Pass-through filter over the host's attachment metadata payload.
    ///
    /// Records `image_meta.caption` as a manual edit and returns `data`
    /// unchanged. Failures are logged, never propagated, so the host's
    /// own save always proceeds.
    pub async fn detect_manual_edits(
        &self,
        ctx: &EditContext,
        data: serde_json::Value,
        object_id: i64,
    ) -> serde_json::Value {
        if let Err(e) = self.record_caption_edit(ctx, &data, object_id).await {
            warn!(media_id = object_id, error = %e, "Failed to record caption edit");
        }
        data
    }

    /// Record the caption carried by an attachment metadata payload.
    pub async fn record_caption_edit(
        &self,
        ctx: &EditContext,
        data: &serde_json::Value,
        object_id: i64,
    ) -> AppResult<Option<VersionRecord>> {
        let Some(caption) = data
            .get("image_meta")
            .and_then(|meta| meta.get("caption"))
            .and_then(serde_json::Value::as_str)
        else {
            return Ok(None);
        };
        if caption.trim().is_empty() {
            return Ok(None);
        }
        let Some(media_id) = self.media_target(ctx, object_id).await? else {
            return Ok(None);
        };
        self.maybe_save_manual_version(ctx, media_id, MetadataField::Caption, caption)
            .await
    }

    /// Resolve `object_id` to a media item unless detection is suppressed.
    async fn media_target(
        &self,
        ctx: &EditContext,
        object_id: i64,
    ) -> AppResult<Option<MediaId>> {
        if let Some(op) = ctx.bulk {
            debug!(object_id, operation = op.as_str(), "Bulk operation, not a manual edit");
            return Ok(None);
        }
        let Ok(media_id) = MediaId::new(object_id) else {
            return Ok(None);
        };
        if !self.library.is_media_item(object_id).await? {
            return Ok(None);
        }
        Ok(Some(media_id))
    }

    async fn maybe_save_manual_version(
        &self,
        ctx: &EditContext,
        media_id: MediaId,
        field: MetadataField,
        value: &str,
    ) -> AppResult<Option<VersionRecord>> {
        if value.trim().is_empty() {
            return Ok(None);
        }

        let locale = ctx.locale_or(&self.default_locale);
        let key = VersionKey::new(media_id, locale.clone(), field);
        if self.versioning.value_exists(&key, value).await? {
            return Ok(None);
        }

        let outcome = self
            .versioning
            .save(NewVersion::new(key, value, MetadataSource::Manual))
            .await?;
        let SaveOutcome::Created(record) = outcome else {
            return Ok(None);
        };

        self.library
            .record_source_marker(media_id, field, MetadataSource::Manual, record.version)
            .await?;

        info!(
            media_id = %media_id,
            locale = %record.locale,
            field = %field,
            version = record.version,
            actor = ctx.actor.as_deref().unwrap_or("unknown"),
            "Recorded manual edit"
        );
        if let Some(bus) = &self.events {
            bus.publish(MetadataEvent::ManualEditRecorded {
                media_id: media_id.get(),
                locale: record.locale.to_string(),
                field: field.to_string(),
                version: record.version,
            });
        }
        Ok(Some(record))
    }
}
