//! Change registry. Listeners register once and receive every change in
//! priority order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use medialedger_core::error::AppError;

use super::{ChangeListener, FieldChange};
use crate::context::EditContext;

/// Default per-listener time limit.
const DEFAULT_LISTENER_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one [`ChangeRegistry::notify`] call.
#[derive(Debug, Default)]
pub struct NotifyReport {
    /// Listeners that handled the change successfully.
    pub delivered: usize,
    /// Listener name and error for every failure.
    pub failures: Vec<(String, AppError)>,
}

impl NotifyReport {
    /// Whether every listener succeeded.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Entry in the change registry.
#[derive(Debug)]
struct ListenerEntry {
    listener: Arc<dyn ChangeListener>,
    priority: i32,
    name: String,
}

/// Registry of change listeners.
///
/// A failing listener does not stop delivery to the others.
#[derive(Debug)]
pub struct ChangeRegistry {
    listeners: RwLock<Vec<ListenerEntry>>,
    timeout: Duration,
}

impl ChangeRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            timeout: DEFAULT_LISTENER_TIMEOUT,
        }
    }

    /// Override the per-listener time limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers a listener. A listener with the same name is replaced.
    pub async fn register(&self, listener: Arc<dyn ChangeListener>) {
        let name = listener.name().to_string();
        let priority = listener.priority();

        let mut listeners = self.listeners.write().await;
        listeners.retain(|e| e.name != name);
        listeners.push(ListenerEntry {
            listener,
            priority,
            name: name.clone(),
        });
        listeners.sort_by_key(|e| e.priority);

        info!(listener = %name, priority, "Change listener registered");
    }

    /// Removes a listener by name. Returns whether one was removed.
    pub async fn unregister(&self, name: &str) -> bool {
        let mut listeners = self.listeners.write().await;
        let before = listeners.len();
        listeners.retain(|e| e.name != name);
        let removed = listeners.len() != before;
        if removed {
            info!(listener = %name, "Change listener unregistered");
        }
        removed
    }

    /// Number of registered listeners.
    pub async fn len(&self) -> usize {
        self.listeners.read().await.len()
    }

    /// Whether no listener is registered.
    pub async fn is_empty(&self) -> bool {
        self.listeners.read().await.is_empty()
    }

    /// Deliver `change` to every listener.
    pub async fn notify(&self, ctx: &EditContext, change: &FieldChange) -> NotifyReport {
        let listeners: Vec<(String, Arc<dyn ChangeListener>)> = {
            let guard = self.listeners.read().await;
            guard
                .iter()
                .map(|e| (e.name.clone(), e.listener.clone()))
                .collect()
        };

        let mut report = NotifyReport::default();
        if listeners.is_empty() {
            return report;
        }

        debug!(
            media_id = change.media_id,
            field = %change.field,
            listener_count = listeners.len(),
            "Dispatching change"
        );

        for (name, listener) in listeners {
            let call =
                listener.on_field_changed(ctx, change.media_id, &change.field, &change.value);
            match tokio::time::timeout(self.timeout, call).await {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    warn!(
                        listener = %name,
                        media_id = change.media_id,
                        field = %change.field,
                        error = %e,
                        "Change listener failed"
                    );
                    report.failures.push((name, e));
                }
                Err(_) => {
                    error!(
                        listener = %name,
                        media_id = change.media_id,
                        "Change listener timed out"
                    );
                    report.failures.push((
                        name.clone(),
                        AppError::internal(format!("Listener '{name}' timed out")),
                    ));
                }
            }
        }

        report
    }
}

impl Default for ChangeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
