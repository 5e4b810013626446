use std::collections::HashMap;

use async_trait::async_trait;
use common::Event;

use crate::Result;

/// Durable store for view entries and their per-key event logs.
///
/// A view entry is the current value for a `(collection, key)` pair;
/// writes are full-value replacements. Each key also has an append-only
/// log of the events that produced its value; the log is independent of
/// whether the entry currently exists.
///
/// Implementations must be thread-safe (Send + Sync) and tolerate
/// concurrent calls from multiple dispatcher instances sharing one store.
#[async_trait]
pub trait ViewStore: Send + Sync {
    /// Durably stores `value` as the current entry for `(collection, key)`
    /// and appends `event` to that key's log, as one logical unit.
    async fn persist(
        &self,
        event: &Event,
        collection: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<()>;

    /// Removes the current entry for `(collection, key)`.
    ///
    /// The key's event log is retained, so a deleted-and-recreated key
    /// keeps its full history.
    async fn delete(&self, collection: &str, key: &str) -> Result<()>;

    /// Returns the current value for `(collection, key)`, or `None` if
    /// the entry does not exist.
    async fn get(&self, collection: &str, key: &str) -> Result<Option<serde_json::Value>>;

    /// Returns every current entry in `collection`, keyed by entry key.
    ///
    /// Internal bookkeeping keys (event-log storage) must never appear
    /// in the result; that is a backend responsibility.
    async fn get_all(&self, collection: &str) -> Result<HashMap<String, serde_json::Value>>;

    /// Returns the event log for `(collection, key)`, oldest first.
    async fn get_events(&self, collection: &str, key: &str) -> Result<Vec<Event>>;
}

/// Backend connection settings.
///
/// The namespace prefixes every stored key so multiple logical
/// deployments can safely share one backing store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub namespace: String,
}

impl StoreConfig {
    /// Creates a config with the given connection URL and namespace.
    pub fn new(url: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            namespace: namespace.into(),
        }
    }

    /// Loads configuration from environment variables, falling back to
    /// defaults.
    ///
    /// - `REDIS_URL` — connection URL (default: `"redis://127.0.0.1:6379"`)
    /// - `VIEW_NAMESPACE` — key prefix (default: `"views"`)
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            namespace: std::env::var("VIEW_NAMESPACE").unwrap_or_else(|_| "views".to_string()),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            namespace: "views".to_string(),
        }
    }
}
