//! Per-event scope lifecycle: open, fan out to handlers, commit.

use common::Event;
use storage::ViewStore;
use view_state::{CommitReport, ViewState};

use crate::handler::EventHandler;

/// Dispatches events to registered handlers and commits the resulting
/// scope.
///
/// One dispatcher processes events strictly one at a time; `dispatch`
/// takes `&mut self` so a second event cannot enter while the first is
/// still committing. Run one instance per logical partition for
/// concurrency; instances may share the backing store.
pub struct Dispatcher<S: ViewStore> {
    store: S,
    handlers: Vec<Box<dyn EventHandler>>,
}

impl<S: ViewStore> Dispatcher<S> {
    /// Creates a dispatcher over the given store with no handlers.
    pub fn new(store: S) -> Self {
        Self {
            store,
            handlers: Vec::new(),
        }
    }

    /// Registers a handler. Handlers run in registration order.
    pub fn register(&mut self, handler: Box<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Returns a reference to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Processes one event: opens a fresh scope, invokes every handler,
    /// then commits the accumulated operations.
    ///
    /// A failing handler is logged and does not prevent sibling handlers
    /// from running or their pending operations from committing; views
    /// are independent projections of the same event.
    #[tracing::instrument(skip(self, event), fields(event_type = %event.event_type))]
    pub async fn dispatch(&mut self, event: Event) -> CommitReport {
        let mut view = ViewState::new(&self.store);

        for handler in &self.handlers {
            if let Err(error) = handler.handle(&event, &mut view).await {
                tracing::error!(handler = handler.name(), %error, "handler failed");
                metrics::counter!("dispatch_handler_failures").increment(1);
            }
        }

        let report = view.commit(&event).await;
        if !report.is_clean() {
            tracing::warn!(
                failed_keys = report.failures.len(),
                committed = report.committed,
                "event committed with per-key failures"
            );
        }
        metrics::counter!("dispatch_events_processed").increment(1);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::InMemoryViewStore;

    struct CreateFixedKey;

    #[async_trait]
    impl EventHandler for CreateFixedKey {
        fn name(&self) -> &'static str {
            "CreateFixedKey"
        }

        async fn handle(
            &self,
            event: &Event,
            view: &mut ViewState<'_>,
        ) -> view_state::Result<()> {
            view.create("data", "1", event.data.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn dispatch_with_no_handlers_commits_nothing() {
        let mut dispatcher = Dispatcher::new(InMemoryViewStore::new());
        let report = dispatcher
            .dispatch(Event::new("create", "tester", serde_json::json!({})))
            .await;

        assert!(report.is_clean());
        assert_eq!(report.committed, 0);
    }

    #[tokio::test]
    async fn dispatch_commits_handler_writes() {
        let mut dispatcher = Dispatcher::new(InMemoryViewStore::new());
        dispatcher.register(Box::new(CreateFixedKey));
        assert_eq!(dispatcher.handler_count(), 1);

        let report = dispatcher
            .dispatch(Event::new("create", "tester", serde_json::json!({"id": 1})))
            .await;
        assert!(report.is_clean());
        assert_eq!(report.committed, 1);

        let stored = dispatcher.store().get("data", "1").await.unwrap();
        assert_eq!(stored, Some(serde_json::json!({"id": 1})));
    }
}
