use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A domain event as delivered by an ingestion driver.
///
/// Events are immutable once created and carry no identity of their own:
/// their ordering is given by their position in a key's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The kind of event (e.g., "create", "merge").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Who produced the event.
    pub author: String,

    /// When the event was created.
    pub created: DateTime<Utc>,

    /// The event payload.
    pub data: serde_json::Value,
}

impl Event {
    /// Creates an event stamped with the current time.
    pub fn new(
        event_type: impl Into<String>,
        author: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            author: author.into(),
            created: Utc::now(),
            data,
        }
    }
}
