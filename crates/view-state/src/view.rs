//! Cache-over-store view of durable state for one event's processing.

use std::collections::HashMap;

use common::{Event, ViewKey};
use storage::{StoreError, ViewStore};

use crate::Result;
use crate::scope::{PendingOp, Scope};

/// Outcome of committing one scope.
///
/// Each key is an independent durability unit: a failing key is recorded
/// here and does not stop the remaining keys from committing. The core
/// never retries; retry policy belongs to whatever supervises the
/// dispatcher.
#[derive(Debug, Default)]
pub struct CommitReport {
    /// Number of keys committed successfully.
    pub committed: usize,
    /// Keys whose commit failed, with the store error for each.
    pub failures: Vec<CommitFailure>,
}

impl CommitReport {
    /// True when every key committed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A single key's commit failure.
#[derive(Debug)]
pub struct CommitFailure {
    pub key: ViewKey,
    pub error: StoreError,
}

/// Buffered view of durable state, scoped to one event.
///
/// The dispatcher creates one `ViewState` per event and hands it to every
/// handler in turn. Mutations accumulate in the scope; reads consult the
/// scope first and fall through to the backing store, so handlers always
/// see their own uncommitted writes and later handlers see earlier
/// handlers' writes. Constructing the value only inside the dispatcher is
/// what makes "mutation outside a handled event" unrepresentable.
pub struct ViewState<'a> {
    store: &'a dyn ViewStore,
    scope: Scope,
}

impl<'a> ViewState<'a> {
    /// Opens a fresh scope over `store`.
    pub fn new(store: &'a dyn ViewStore) -> Self {
        Self {
            store,
            scope: Scope::default(),
        }
    }

    /// Records a full-value write for `(collection, key)`, replacing any
    /// pending operation for that key in this scope.
    pub fn create(&mut self, collection: &str, key: &str, value: serde_json::Value) {
        self.scope
            .record(ViewKey::new(collection, key), PendingOp::Put(value));
    }

    /// Shallow-merges `value` into the key's current effective value.
    ///
    /// Object fields of `value` win over existing fields; non-object
    /// pairs are replaced wholesale. With no prior value in scope or
    /// storage this behaves like [`create`](Self::create).
    pub async fn merge(
        &mut self,
        collection: &str,
        key: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        self.merge_with(collection, key, move |current| merge_values(current, value))
            .await
    }

    /// Applies `f` to the current effective value and records the result.
    ///
    /// `f` receives `None` when the key has no pending operation and no
    /// stored value. Because merges resolve eagerly, the Nth merge in a
    /// scope always sees the result of the first N−1.
    pub async fn merge_with<F>(&mut self, collection: &str, key: &str, f: F) -> Result<()>
    where
        F: FnOnce(Option<serde_json::Value>) -> serde_json::Value + Send,
    {
        let view_key = ViewKey::new(collection, key);
        let current = match self.scope.get(&view_key) {
            Some(PendingOp::Put(value)) => Some(value.clone()),
            Some(PendingOp::Delete) => None,
            None => self.store.get(collection, key).await?,
        };
        self.scope.record(view_key, PendingOp::Put(f(current)));
        Ok(())
    }

    /// Records a tombstone for `(collection, key)`, replacing any pending
    /// operation. Reads in this scope see the key as absent from here on,
    /// whatever the store currently holds.
    pub fn delete(&mut self, collection: &str, key: &str) {
        self.scope
            .record(ViewKey::new(collection, key), PendingOp::Delete);
    }

    /// Current effective value for `(collection, key)`: the pending
    /// operation if one exists, otherwise the stored value.
    pub async fn get(&self, collection: &str, key: &str) -> Result<Option<serde_json::Value>> {
        match self.scope.get(&ViewKey::new(collection, key)) {
            Some(PendingOp::Put(value)) => Ok(Some(value.clone())),
            Some(PendingOp::Delete) => Ok(None),
            None => Ok(self.store.get(collection, key).await?),
        }
    }

    /// Store snapshot of `collection` with this scope's overrides applied:
    /// pending writes replace stored values, tombstoned keys are removed,
    /// untouched keys pass through unchanged.
    pub async fn get_all(&self, collection: &str) -> Result<HashMap<String, serde_json::Value>> {
        let mut entries = self.store.get_all(collection).await?;
        for (key, op) in self.scope.ops() {
            if key.collection != collection {
                continue;
            }
            match op {
                PendingOp::Put(value) => {
                    entries.insert(key.key.clone(), value.clone());
                }
                PendingOp::Delete => {
                    entries.remove(&key.key);
                }
            }
        }
        Ok(entries)
    }

    /// Event log for `(collection, key)`, oldest first. The log only
    /// grows on commit, so pending operations have no effect here.
    pub async fn get_events(&self, collection: &str, key: &str) -> Result<Vec<Event>> {
        Ok(self.store.get_events(collection, key).await?)
    }

    /// Number of keys with a pending operation.
    pub fn pending(&self) -> usize {
        self.scope.len()
    }

    /// Commits every pending operation, one durability unit per key, in
    /// the order keys were first touched. A failing key is logged and
    /// recorded in the report; the remaining keys still commit.
    pub async fn commit(self, event: &Event) -> CommitReport {
        let ViewState { store, scope } = self;
        let mut report = CommitReport::default();

        for (key, op) in scope.into_ops() {
            let result = match &op {
                PendingOp::Put(value) => {
                    store.persist(event, &key.collection, &key.key, value).await
                }
                PendingOp::Delete => store.delete(&key.collection, &key.key).await,
            };
            match result {
                Ok(()) => report.committed += 1,
                Err(error) => {
                    tracing::error!(key = %key, %error, "commit failed for key");
                    metrics::counter!("view_commit_failures").increment(1);
                    report.failures.push(CommitFailure { key, error });
                }
            }
        }

        metrics::counter!("view_keys_committed").increment(report.committed as u64);
        report
    }
}

/// Shallow merge: object fields of `incoming` win over `current`;
/// non-object pairs are replaced wholesale.
fn merge_values(
    current: Option<serde_json::Value>,
    incoming: serde_json::Value,
) -> serde_json::Value {
    match (current, incoming) {
        (Some(serde_json::Value::Object(mut base)), serde_json::Value::Object(update)) => {
            for (field, value) in update {
                base.insert(field, value);
            }
            serde_json::Value::Object(base)
        }
        (_, incoming) => incoming,
    }
}
