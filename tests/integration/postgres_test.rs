//! PostgreSQL version store. Skipped unless `DATABASE_URL` is set.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use medialedger_database::schema::{self, SCHEMA_VERSION, SCHEMA_VERSION_KEY};
use medialedger_database::{MetadataVersionRepository, SettingsRepository, VersionStore};
use medialedger_entity::metadata::{MetadataField, NewVersion};
use medialedger_service::{RetryPolicy, VersioningService};

use crate::helpers::{key, locale, media, postgres_pool, unique_media_id};

fn candidate(media_id: i64, field: &str, value: &str, source: &str) -> NewVersion {
    NewVersion::parse(media_id, "en", field, value, source).unwrap()
}

#[tokio::test]
async fn test_schema_creation_is_idempotent_and_marked() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let repo = MetadataVersionRepository::new(db.pool().clone());

    assert!(repo.ensure_schema().await.unwrap());
    assert!(repo.ensure_schema().await.unwrap());
    assert!(schema::table_exists(db.pool()).await.unwrap());

    let marker = SettingsRepository::new(db.pool().clone())
        .get(SCHEMA_VERSION_KEY)
        .await
        .unwrap();
    assert_eq!(marker, Some(SCHEMA_VERSION.to_string()));
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_taken_version_is_a_conflict() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let repo = MetadataVersionRepository::new(db.pool().clone());
    repo.ensure_schema().await.unwrap();
    let id = unique_media_id();

    let first = repo
        .insert(&candidate(id, "title", "A", "ai"), 1)
        .await
        .unwrap();
    assert_eq!(first.version, 1);
    assert_eq!(first.checksum.as_str().len(), 64);

    let err = repo
        .insert(&candidate(id, "title", "B", "manual"), 1)
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "{err}");

    let history = repo.history(&key(id, "en", "title")).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].value, "A");

    assert_eq!(repo.purge_media(media(id)).await.unwrap(), 1);
}

#[tokio::test]
async fn test_history_for_locale_ordering() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let repo = MetadataVersionRepository::new(db.pool().clone());
    repo.ensure_schema().await.unwrap();
    let id = unique_media_id();

    repo.insert(&candidate(id, "title", "T1", "ai"), 1).await.unwrap();
    repo.insert(&candidate(id, "alt", "A1", "ai"), 1).await.unwrap();
    repo.insert(&candidate(id, "title", "T2", "manual"), 2).await.unwrap();
    repo.insert(&candidate(id, "alt", "A2", "manual"), 2).await.unwrap();
    let mut french = candidate(id, "caption", "C1", "ai");
    french.key.locale = locale("fr");
    repo.insert(&french, 1).await.unwrap();

    let rows = repo
        .history_for_locale(media(id), &locale("en"))
        .await
        .unwrap();
    let order: Vec<(MetadataField, u32)> = rows.iter().map(|r| (r.field, r.version)).collect();
    assert_eq!(
        order,
        vec![
            (MetadataField::Alt, 2),
            (MetadataField::Alt, 1),
            (MetadataField::Title, 2),
            (MetadataField::Title, 1),
        ]
    );

    assert_eq!(repo.purge_media(media(id)).await.unwrap(), 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_are_gapless() {
    let Some(db) = postgres_pool().await else {
        return;
    };
    let repo = MetadataVersionRepository::new(db.pool().clone());
    let versioning = Arc::new(VersioningService::new(
        Arc::new(repo),
        RetryPolicy {
            max_attempts: 32,
            backoff: Duration::from_millis(2),
        },
    ));
    assert!(versioning.maybe_create_table().await.unwrap());
    let id = unique_media_id();

    let writers = (0..20).map(|i| {
        let versioning = Arc::clone(&versioning);
        tokio::spawn(async move {
            versioning
                .save_raw(id, "en", "title", &format!("value {i}"), "ai")
                .await
        })
    });
    for result in join_all(writers).await {
        assert!(result.unwrap().unwrap().is_created());
    }

    let mut versions: Vec<u32> = versioning
        .get_version_history(&key(id, "en", "title"))
        .await
        .unwrap()
        .iter()
        .map(|r| r.version)
        .collect();
    versions.sort_unstable();
    assert_eq!(versions, (1..=20).collect::<Vec<u32>>());

    versioning.purge_media(media(id)).await.unwrap();
}
