//! Handler contract for event processing.

use async_trait::async_trait;
use common::Event;
use view_state::ViewState;

/// Handler logic invoked once per event.
///
/// Handlers derive view mutations from events by calling `create`,
/// `merge`, and `delete` on the view, and read back state through it.
/// They run sequentially in registration order, so a later handler
/// observes earlier handlers' pending writes.
///
/// A handler error is isolated: it is logged by the dispatcher and does
/// not abort sibling handlers or the commit of operations already issued.
/// Delivery is at-least-once; handlers that are not idempotent must
/// deduplicate themselves.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Returns the name of this handler, used in failure logs.
    fn name(&self) -> &'static str;

    /// Handles a single event against the active view scope.
    async fn handle(&self, event: &Event, view: &mut ViewState<'_>) -> view_state::Result<()>;
}
