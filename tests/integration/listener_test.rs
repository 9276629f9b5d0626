//! Host notifications routed through the change registry.

use serde_json::json;

use medialedger_entity::metadata::MetadataSource;
use medialedger_service::protection::ALT_TEXT_META_KEY;
use medialedger_service::{BulkOperation, EditContext, FieldChange};

use crate::helpers::{TestApp, key, locale};

#[tokio::test]
async fn test_notifications_record_manual_versions() {
    let app = TestApp::new().await;
    app.library.put(21, "Lighthouse", "Stone lighthouse at dawn").await;
    let ctx = EditContext::interactive().with_locale(locale("fr-fr"));

    let changes = [
        FieldChange::post(21),
        FieldChange::meta(21, ALT_TEXT_META_KEY, "Phare en pierre"),
        FieldChange::attachment_metadata(
            21,
            json!({ "image_meta": { "caption": "Le phare" } }),
        ),
        FieldChange::meta(21, "_unrelated_meta", "ignored"),
    ];
    for change in &changes {
        let report = app.registry.notify(&ctx, change).await;
        assert!(report.is_ok());
        assert_eq!(report.delivered, 1);
    }

    for field in ["title", "description", "alt", "caption"] {
        let active = app
            .versioning
            .get_active_version(&key(21, "fr_FR", field))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(active.source, MetadataSource::Manual, "{field}");
    }
    assert_eq!(app.store.row_count().await, 4);
}

#[tokio::test]
async fn test_default_locale_used_without_context_locale() {
    let app = TestApp::new().await;
    app.library.put(22, "Harbour", "").await;

    app.registry
        .notify(&EditContext::interactive(), &FieldChange::post(22))
        .await;

    assert!(
        app.versioning
            .get_active_version(&key(22, "en", "title"))
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_notifications_during_bulk_run_are_ignored() {
    let app = TestApp::new().await;
    app.library.put(23, "Title", "Body").await;
    let ctx = EditContext::bulk(BulkOperation::BulkOptimize);

    app.registry.notify(&ctx, &FieldChange::post(23)).await;
    app.registry
        .notify(&ctx, &FieldChange::meta(23, ALT_TEXT_META_KEY, "Alt"))
        .await;

    assert_eq!(app.store.row_count().await, 0);
}

#[tokio::test]
async fn test_non_media_objects_are_ignored() {
    let app = TestApp::new().await;

    let report = app
        .registry
        .notify(
            &EditContext::interactive(),
            &FieldChange::meta(99, ALT_TEXT_META_KEY, "Not an image"),
        )
        .await;
    assert!(report.is_ok());
    assert_eq!(app.store.row_count().await, 0);
}
