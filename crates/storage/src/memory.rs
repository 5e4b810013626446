use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::Event;
use tokio::sync::RwLock;

use crate::{Result, ViewStore};

/// In-memory view store implementation for testing.
///
/// Stores entries and event logs in memory and provides the same
/// interface as the Redis implementation. Event logs survive deletes,
/// matching the reference backend's policy.
#[derive(Clone, Default)]
pub struct InMemoryViewStore {
    values: Arc<RwLock<HashMap<(String, String), serde_json::Value>>>,
    events: Arc<RwLock<HashMap<(String, String), Vec<Event>>>>,
}

impl InMemoryViewStore {
    /// Creates a new empty in-memory view store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of logged events across all keys.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.values().map(Vec::len).sum()
    }

    /// Clears all entries and event logs.
    pub async fn clear(&self) {
        self.values.write().await.clear();
        self.events.write().await.clear();
    }
}

#[async_trait]
impl ViewStore for InMemoryViewStore {
    async fn persist(
        &self,
        event: &Event,
        collection: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<()> {
        let entry = (collection.to_string(), key.to_string());
        self.values
            .write()
            .await
            .insert(entry.clone(), value.clone());
        self.events
            .write()
            .await
            .entry(entry)
            .or_default()
            .push(event.clone());
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let entry = (collection.to_string(), key.to_string());
        self.values.write().await.remove(&entry);
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<serde_json::Value>> {
        let entry = (collection.to_string(), key.to_string());
        Ok(self.values.read().await.get(&entry).cloned())
    }

    async fn get_all(&self, collection: &str) -> Result<HashMap<String, serde_json::Value>> {
        let values = self.values.read().await;
        Ok(values
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|((_, k), v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn get_events(&self, collection: &str, key: &str) -> Result<Vec<Event>> {
        let entry = (collection.to_string(), key.to_string());
        Ok(self
            .events
            .read()
            .await
            .get(&entry)
            .cloned()
            .unwrap_or_default())
    }
}
