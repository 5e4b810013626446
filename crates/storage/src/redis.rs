//! Redis-backed view store, the reference backend.
//!
//! Layout:
//! - value key `"<namespace>:<collection>:<key>"` holds a codec-encoded
//!   `{key, value}` envelope
//! - log key `"<namespace>:<collection>:<key>:events"` is a list of
//!   codec-encoded events, appended on every persist
//!
//! The envelope exists so `get_all` can recover original entry keys after
//! a bulk fetch without parsing Redis key strings.

use std::collections::HashMap;

use ::redis::aio::ConnectionManager;
use ::redis::{AsyncCommands, Client};
use async_trait::async_trait;
use common::Event;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{Result, StoreConfig, StoreError, ViewStore};

const EVENTS_SUFFIX: &str = ":events";

/// Wrapper stored at each value key.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    key: String,
    value: serde_json::Value,
}

/// View store backed by Redis.
///
/// The connection is initialized lazily: every operation fails with
/// [`StoreError::NotInitialized`] until [`init`](Self::init) completes.
/// The underlying store serializes per-key operations, so multiple
/// dispatcher instances can share one `RedisViewStore`.
pub struct RedisViewStore {
    config: StoreConfig,
    conn: RwLock<Option<ConnectionManager>>,
}

impl RedisViewStore {
    /// Creates an unconnected store holding only configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            conn: RwLock::new(None),
        }
    }

    /// Connects to Redis and installs the pooled connection.
    ///
    /// Idempotent; a later call replaces the existing connection.
    pub async fn init(&self) -> Result<()> {
        let client = Client::open(self.config.url.as_str())?;
        let manager = ConnectionManager::new(client).await?;
        *self.conn.write().await = Some(manager);
        tracing::info!(namespace = %self.config.namespace, "view store connected");
        Ok(())
    }

    /// Creates and connects a store in one step.
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let store = Self::new(config);
        store.init().await?;
        Ok(store)
    }

    async fn conn(&self) -> Result<ConnectionManager> {
        self.conn
            .read()
            .await
            .clone()
            .ok_or(StoreError::NotInitialized)
    }

    fn value_key(&self, collection: &str, key: &str) -> String {
        format!("{}:{}:{}", self.config.namespace, collection, key)
    }

    fn events_key(&self, collection: &str, key: &str) -> String {
        format!("{}{}", self.value_key(collection, key), EVENTS_SUFFIX)
    }
}

#[async_trait]
impl ViewStore for RedisViewStore {
    async fn persist(
        &self,
        event: &Event,
        collection: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<()> {
        let mut conn = self.conn().await?;

        let envelope = codec::encode(&Envelope {
            key: key.to_string(),
            value: value.clone(),
        })?;
        let encoded_event = codec::encode(event)?;

        // Value replacement and log append are one unit from the caller's
        // perspective.
        let _: () = ::redis::pipe()
            .atomic()
            .set(self.value_key(collection, key), envelope)
            .rpush(self.events_key(collection, key), encoded_event)
            .query_async(&mut conn)
            .await?;

        metrics::counter!("view_store_persists").increment(1);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<()> {
        let mut conn = self.conn().await?;

        // The event log is retained; only the value entry goes.
        let _: () = conn.del(self.value_key(collection, key)).await?;

        metrics::counter!("view_store_deletes").increment(1);
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<serde_json::Value>> {
        let mut conn = self.conn().await?;

        let bytes: Option<Vec<u8>> = conn.get(self.value_key(collection, key)).await?;
        match bytes {
            Some(bytes) => {
                let envelope: Envelope = codec::decode(&bytes)?;
                Ok(Some(envelope.value))
            }
            None => Ok(None),
        }
    }

    async fn get_all(&self, collection: &str) -> Result<HashMap<String, serde_json::Value>> {
        let conn = self.conn().await?;

        // SCAN rather than KEYS so large keyspaces don't block the server.
        let pattern = format!("{}:{}:*", self.config.namespace, collection);
        let mut keys: Vec<String> = Vec::new();
        {
            let mut scan_conn = conn.clone();
            let mut iter = scan_conn.scan_match::<_, String>(&pattern).await?;
            while let Some(key) = iter.next_item().await {
                if !key.ends_with(EVENTS_SUFFIX) {
                    keys.push(key);
                }
            }
        }

        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = conn;
        let values: Vec<Option<Vec<u8>>> = conn.mget(&keys).await?;

        let mut entries = HashMap::with_capacity(values.len());
        for bytes in values.into_iter().flatten() {
            let envelope: Envelope = codec::decode(&bytes)?;
            entries.insert(envelope.key, envelope.value);
        }
        Ok(entries)
    }

    async fn get_events(&self, collection: &str, key: &str) -> Result<Vec<Event>> {
        let mut conn = self.conn().await?;

        let entries: Vec<Vec<u8>> = conn.lrange(self.events_key(collection, key), 0, -1).await?;
        entries
            .iter()
            .map(|bytes| codec::decode(bytes).map_err(StoreError::from))
            .collect()
    }
}
