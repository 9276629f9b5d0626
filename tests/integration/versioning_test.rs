//! Integration tests for the versioned attribute store.

use medialedger_core::events::MetadataEvent;
use medialedger_entity::metadata::{MetadataField, MetadataSource, SaveOutcome};

use crate::helpers::{TestApp, key, locale, media};

#[tokio::test]
async fn test_title_history_scenario() {
    let app = TestApp::new().await;
    let v = &app.versioning;

    assert_eq!(v.save_raw(42, "en", "title", "A", "ai").await.unwrap().version(), 1);
    assert_eq!(
        v.save_raw(42, "en", "title", "A", "ai").await.unwrap(),
        SaveOutcome::Unchanged { version: 1 }
    );
    assert_eq!(v.save_raw(42, "en", "title", "B", "manual").await.unwrap().version(), 2);

    let k = key(42, "en", "title");
    assert_eq!(v.get_latest_version_number(&k).await.unwrap(), 2);

    let active = v.get_active_version(&k).await.unwrap().unwrap();
    assert_eq!(active.value, "B");
    assert_eq!(active.source, MetadataSource::Manual);

    let history: Vec<u32> = v
        .get_version_history(&k)
        .await
        .unwrap()
        .iter()
        .map(|r| r.version)
        .collect();
    assert_eq!(history, vec![2, 1]);

    let first = v.get_version(&k, 1).await.unwrap().unwrap();
    assert_eq!(first.value, "A");
    assert!(v.get_version(&k, 3).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_field_rejected_without_writes() {
    let app = TestApp::new().await;

    let err = app
        .versioning
        .save_raw(42, "en", "summary", "x", "ai")
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(app.store.row_count().await, 0);
}

#[tokio::test]
async fn test_locale_is_normalized_for_lookup() {
    let app = TestApp::new().await;
    app.versioning
        .save_raw(7, " es_ES ", "alt", "Perro", "ai")
        .await
        .unwrap();

    for tag in ["es_ES", "es-es", " ES_es"] {
        let active = app
            .versioning
            .get_active_version(&key(7, tag, "alt"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(active.locale.as_str(), "es_ES");
    }
    assert!(
        app.versioning
            .get_active_version(&key(7, "es_MX", "alt"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_keys_are_independent() {
    let app = TestApp::new().await;
    let v = &app.versioning;

    v.save_raw(1, "en", "title", "Same", "ai").await.unwrap();
    assert!(v.save_raw(1, "fr", "title", "Same", "ai").await.unwrap().is_created());
    assert!(v.save_raw(1, "en", "alt", "Same", "ai").await.unwrap().is_created());
    assert!(v.save_raw(2, "en", "title", "Same", "ai").await.unwrap().is_created());
    assert_eq!(app.store.row_count().await, 4);
}

#[tokio::test]
async fn test_ai_vs_manual_report() {
    let app = TestApp::new().await;
    let v = &app.versioning;

    v.save_raw(9, "en", "caption", "AI caption", "ai").await.unwrap();
    v.save_raw(9, "en", "caption", "Human caption", "manual").await.unwrap();
    v.save_raw(9, "en", "caption", "Newer AI caption", "ai").await.unwrap();
    v.save_raw(9, "en", "description", "Template text", "template").await.unwrap();

    let diffs = v.get_ai_vs_manual_diff(media(9), &locale("en")).await.unwrap();
    assert_eq!(
        diffs.keys().copied().collect::<Vec<_>>(),
        vec![MetadataField::Caption, MetadataField::Description]
    );

    let caption = &diffs[&MetadataField::Caption];
    assert!(caption.has_manual);
    assert!(!caption.manual_is_active);
    assert_eq!(caption.active.version, 3);
    assert_eq!(caption.ai.as_ref().unwrap().version, 3);
    assert_eq!(caption.manual.as_ref().unwrap().value, "Human caption");

    let description = &diffs[&MetadataField::Description];
    assert!(description.ai.is_none());
    assert!(description.manual.is_none());
    assert_eq!(description.active.source, MetadataSource::Template);
}

#[tokio::test]
async fn test_purge_removes_history_and_publishes() {
    let app = TestApp::new().await;
    let mut rx = app.events.subscribe();

    app.versioning.save_raw(3, "en", "title", "A", "ai").await.unwrap();
    app.versioning.save_raw(3, "de", "alt", "B", "manual").await.unwrap();
    app.versioning.save_raw(4, "en", "title", "C", "ai").await.unwrap();

    assert_eq!(app.versioning.purge_media(media(3)).await.unwrap(), 2);
    assert_eq!(app.store.row_count().await, 1);
    assert_eq!(
        app.versioning
            .get_latest_version_number(&key(3, "en", "title"))
            .await
            .unwrap(),
        0
    );

    let mut last = None;
    while let Ok(event) = rx.try_recv() {
        last = Some(event.payload);
    }
    assert_eq!(
        last,
        Some(MetadataEvent::HistoryPurged {
            media_id: 3,
            removed: 2
        })
    );
}
