//! Synchronous ingestion driver for tests and manual feeding.

use common::Event;
use storage::ViewStore;
use tokio::sync::mpsc;
use view_state::CommitReport;

use crate::dispatch::Dispatcher;

/// Delivers raw messages straight into a dispatcher, bypassing any real
/// transport.
///
/// A raw message is a codec-encoded [`Event`]. Each decoded event is
/// forwarded to the registered observer (if any) before dispatch, so
/// tests can assert on event receipt without touching transport.
/// Acknowledgement semantics are the caller's concern; delivery here is
/// at-least-once by construction.
pub struct LocalDriver<S: ViewStore> {
    dispatcher: Dispatcher<S>,
    observer: Option<mpsc::UnboundedSender<Event>>,
}

impl<S: ViewStore> LocalDriver<S> {
    /// Wraps a dispatcher in a driver with no observer.
    pub fn new(dispatcher: Dispatcher<S>) -> Self {
        Self {
            dispatcher,
            observer: None,
        }
    }

    /// Registers an observer notified of every decoded event before it
    /// is dispatched. Replaces any previous observer.
    pub fn observe(&mut self, tx: mpsc::UnboundedSender<Event>) {
        self.observer = Some(tx);
    }

    /// Decodes `raw` into an event and dispatches it.
    pub async fn deliver(&mut self, raw: &[u8]) -> Result<CommitReport, codec::CodecError> {
        let event: Event = codec::decode(raw)?;

        if let Some(tx) = &self.observer {
            // A dropped observer is not a delivery failure.
            let _ = tx.send(event.clone());
        }

        Ok(self.dispatcher.dispatch(event).await)
    }

    /// Returns the wrapped dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryViewStore;

    #[tokio::test]
    async fn deliver_rejects_undecodable_messages() {
        let mut driver = LocalDriver::new(Dispatcher::new(InMemoryViewStore::new()));
        let result = driver.deliver(b"not an event").await;
        assert!(matches!(result, Err(codec::CodecError::Decode(_))));
    }

    #[tokio::test]
    async fn deliver_notifies_observer() {
        let mut driver = LocalDriver::new(Dispatcher::new(InMemoryViewStore::new()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        driver.observe(tx);

        let event = Event::new("create", "tester", serde_json::json!({"id": 1}));
        let raw = codec::encode(&event).unwrap();
        driver.deliver(&raw).await.unwrap();

        let observed = rx.recv().await.unwrap();
        assert_eq!(observed, event);
    }

    #[tokio::test]
    async fn deliver_survives_dropped_observer() {
        let mut driver = LocalDriver::new(Dispatcher::new(InMemoryViewStore::new()));
        let (tx, rx) = mpsc::unbounded_channel();
        driver.observe(tx);
        drop(rx);

        let event = Event::new("create", "tester", serde_json::json!({"id": 1}));
        let raw = codec::encode(&event).unwrap();
        let report = driver.deliver(&raw).await.unwrap();
        assert!(report.is_clean());
    }
}
