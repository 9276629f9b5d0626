//! Concurrent writers against one key.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use medialedger_service::RetryPolicy;

use crate::helpers::{TestApp, key};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_values_are_gapless() {
    let app = TestApp::with_retry(RetryPolicy {
        max_attempts: 32,
        backoff: Duration::from_millis(1),
    })
    .await;
    let versioning = Arc::clone(&app.versioning);

    let writers = (0..20).map(|i| {
        let versioning = Arc::clone(&versioning);
        tokio::spawn(async move {
            versioning
                .save_raw(42, "en", "title", &format!("value {i}"), "ai")
                .await
        })
    });

    let results = join_all(writers).await;
    for result in results {
        assert!(result.unwrap().unwrap().is_created());
    }

    let mut versions: Vec<u32> = versioning
        .get_version_history(&key(42, "en", "title"))
        .await
        .unwrap()
        .iter()
        .map(|r| r.version)
        .collect();
    versions.sort_unstable();
    assert_eq!(versions, (1..=20).collect::<Vec<u32>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_values_collapse() {
    let app = TestApp::with_retry(RetryPolicy {
        max_attempts: 32,
        backoff: Duration::from_millis(1),
    })
    .await;

    let writers = (0..10).map(|_| {
        let versioning = Arc::clone(&app.versioning);
        tokio::spawn(async move { versioning.save_raw(5, "en", "alt", "Same", "ai").await })
    });

    let outcomes: Vec<_> = join_all(writers)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .collect();

    assert_eq!(outcomes.iter().filter(|o| o.is_created()).count(), 1);
    assert!(outcomes.iter().all(|o| o.version() == 1));
    assert_eq!(app.store.row_count().await, 1);
}
