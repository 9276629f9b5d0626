//! Shared test helpers for integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use medialedger_core::config::DatabaseConfig;
use medialedger_core::result::AppResult;
use medialedger_database::{DatabasePool, MemoryVersionStore};
use medialedger_entity::metadata::{Locale, MediaId, MetadataField, MetadataSource, VersionKey};
use medialedger_service::{
    AttachmentText, ChangeRegistry, EventBus, ManualEditListener, ManualEditProtection,
    MediaLibrary, RetryPolicy, VersioningService,
};

/// Source marker as recorded by the host.
pub type Marker = (i64, MetadataField, MetadataSource, u32);

/// Host library double backed by in-memory maps.
#[derive(Default)]
pub struct TestLibrary {
    items: Mutex<HashMap<i64, AttachmentText>>,
    pub markers: Mutex<Vec<Marker>>,
}

impl TestLibrary {
    /// Add or replace a media item.
    pub async fn put(&self, media_id: i64, title: &str, description: &str) {
        self.items.lock().await.insert(
            media_id,
            AttachmentText {
                title: title.to_string(),
                description: description.to_string(),
            },
        );
    }
}

#[async_trait]
impl MediaLibrary for TestLibrary {
    async fn is_media_item(&self, object_id: i64) -> AppResult<bool> {
        Ok(self.items.lock().await.contains_key(&object_id))
    }

    async fn attachment_text(&self, media_id: MediaId) -> AppResult<Option<AttachmentText>> {
        Ok(self.items.lock().await.get(&media_id.get()).cloned())
    }

    async fn record_source_marker(
        &self,
        media_id: MediaId,
        field: MetadataField,
        source: MetadataSource,
        version: u32,
    ) -> AppResult<()> {
        self.markers
            .lock()
            .await
            .push((media_id.get(), field, source, version));
        Ok(())
    }
}

/// Fully wired services over a fresh in-memory store.
pub struct TestApp {
    pub store: MemoryVersionStore,
    pub versioning: Arc<VersioningService>,
    pub library: Arc<TestLibrary>,
    pub protection: Arc<ManualEditProtection>,
    pub registry: ChangeRegistry,
    pub events: EventBus,
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_retry(RetryPolicy {
            max_attempts: 5,
            backoff: Duration::ZERO,
        })
        .await
    }

    /// Create a test application with a specific retry policy
    pub async fn with_retry(retry: RetryPolicy) -> Self {
        let store = MemoryVersionStore::new();
        let events = EventBus::new(64);
        let versioning = Arc::new(
            VersioningService::new(Arc::new(store.clone()), retry).with_events(events.clone()),
        );
        assert!(versioning.maybe_create_table().await.unwrap());

        let library = Arc::new(TestLibrary::default());
        let protection = Arc::new(
            ManualEditProtection::new(versioning.clone(), library.clone(), locale("en"))
                .with_events(events.clone()),
        );

        let registry = ChangeRegistry::new();
        registry
            .register(Arc::new(ManualEditListener::new(protection.clone())))
            .await;

        Self {
            store,
            versioning,
            library,
            protection,
            registry,
            events,
        }
    }
}

/// Parse a locale or panic.
pub fn locale(tag: &str) -> Locale {
    Locale::parse(tag).unwrap()
}

/// Parse a key or panic.
pub fn key(media_id: i64, locale: &str, field: &str) -> VersionKey {
    VersionKey::parse(media_id, locale, field).unwrap()
}

/// Build a media id or panic.
pub fn media(id: i64) -> MediaId {
    MediaId::new(id).unwrap()
}

/// Connect to the database named by `DATABASE_URL`, or `None` when the
/// variable is unset so PostgreSQL tests are skipped.
pub async fn postgres_pool() -> Option<DatabasePool> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL test");
        return None;
    };
    let config = DatabaseConfig {
        url,
        max_connections: 20,
        ..DatabaseConfig::default()
    };
    Some(
        DatabasePool::connect(&config)
            .await
            .expect("Failed to connect to test database"),
    )
}

/// A media id no other test run has used, for tests sharing a database.
pub fn unique_media_id() -> i64 {
    static COUNTER: AtomicI64 = AtomicI64::new(0);
    let micros = chrono::Utc::now().timestamp_micros();
    micros * 1000 + COUNTER.fetch_add(1, Ordering::Relaxed) % 1000
}
