//! Integration tests for the manual-edit arbitration policy.

use medialedger_entity::metadata::{MetadataField, MetadataSource};
use medialedger_service::{BulkOperation, EditContext, GatedWrite};

use crate::helpers::{TestApp, locale, media};

#[tokio::test]
async fn test_manual_flag_cleared_by_later_ai_write() {
    let app = TestApp::new().await;
    let en = locale("en");
    let p = &app.protection;

    app.versioning
        .save_raw(11, "en", "alt", "Human", "manual")
        .await
        .unwrap();
    assert!(p.has_manual_edit(media(11), MetadataField::Alt, &en).await.unwrap());

    app.versioning
        .save_raw(11, "en", "alt", "Machine", "ai")
        .await
        .unwrap();
    assert!(!p.has_manual_edit(media(11), MetadataField::Alt, &en).await.unwrap());
}

#[tokio::test]
async fn test_template_value_does_not_block_generation() {
    let app = TestApp::new().await;
    let en = locale("en");

    app.versioning
        .save_raw(12, "en", "caption", "Template", "template")
        .await
        .unwrap();
    let write = app
        .protection
        .write_generated(media(12), MetadataField::Caption, &en, "Generated", false)
        .await
        .unwrap();
    assert!(matches!(write, GatedWrite::Written(ref o) if o.version() == 2));
}

#[tokio::test]
async fn test_generation_pipeline_keeps_manual_value() {
    let app = TestApp::new().await;
    let en = locale("en");
    app.library.put(13, "Photographer's title", "").await;

    let saved = app
        .protection
        .detect_title_change(&EditContext::interactive(), 13)
        .await
        .unwrap();
    assert_eq!(saved.len(), 1);

    let write = app
        .protection
        .write_generated(media(13), MetadataField::Title, &en, "Generated", false)
        .await
        .unwrap();
    assert_eq!(write, GatedWrite::Skipped);

    let active = app
        .versioning
        .get_active_version(&crate::helpers::key(13, "en", "title"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.value, "Photographer's title");
}

#[tokio::test]
async fn test_bulk_run_writes_are_not_manual() {
    let app = TestApp::new().await;
    app.library.put(14, "Bulk title", "Bulk description").await;

    for op in [
        BulkOperation::AiRegeneration,
        BulkOperation::BulkOptimize,
        BulkOperation::CommandLine,
    ] {
        let saved = app
            .protection
            .detect_title_change(&EditContext::bulk(op), 14)
            .await
            .unwrap();
        assert!(saved.is_empty());
    }
    assert_eq!(app.store.row_count().await, 0);
    assert!(app.library.markers.lock().await.is_empty());
}

#[tokio::test]
async fn test_repeated_detection_records_once() {
    let app = TestApp::new().await;
    app.library.put(15, "Title", "Description").await;
    let ctx = EditContext::interactive().with_actor("editor");

    app.protection.detect_title_change(&ctx, 15).await.unwrap();
    app.protection.detect_title_change(&ctx, 15).await.unwrap();

    app.library.put(15, "Retitled", "Description").await;
    let saved = app.protection.detect_title_change(&ctx, 15).await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].version, 2);

    let markers = app.library.markers.lock().await;
    assert_eq!(
        *markers,
        vec![
            (15, MetadataField::Title, MetadataSource::Manual, 1),
            (15, MetadataField::Description, MetadataSource::Manual, 1),
            (15, MetadataField::Title, MetadataSource::Manual, 2),
        ]
    );
}

#[tokio::test]
async fn test_manual_edit_matching_ai_value_is_not_recorded() {
    let app = TestApp::new().await;
    app.library.put(16, "", "").await;
    app.versioning
        .save_raw(16, "en", "alt", "A red bicycle", "ai")
        .await
        .unwrap();

    let record = app
        .protection
        .detect_alt_text_change(
            &EditContext::interactive(),
            16,
            medialedger_service::protection::ALT_TEXT_META_KEY,
            "A red bicycle",
        )
        .await
        .unwrap();
    assert!(record.is_none());
    assert!(
        !app.protection
            .has_manual_edit(media(16), MetadataField::Alt, &locale("en"))
            .await
            .unwrap()
    );
}
