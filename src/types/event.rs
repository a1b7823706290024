//! Inbox event types
//!
//! An `Event` is the single record the inbox stores. It is created `pending`
//! by ingest and flips to `acknowledged` exactly once.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque JSON object carried by an event. Never inspected by the inbox.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Prefix shared by every generated event id
pub const EVENT_ID_PREFIX: &str = "evt_";

/// Unique, URL-safe event identifier (`evt_` + 32 hex chars)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Generate a fresh id from a random v4 UUID
    pub fn generate() -> Self {
        Self(format!("{}{}", EVENT_ID_PREFIX, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle status of an event
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Ingested, waiting for a consumer
    #[default]
    Pending,
    /// Processed by a consumer. Terminal.
    Acknowledged,
}

impl EventStatus {
    pub const ALL: [EventStatus; 2] = [EventStatus::Pending, EventStatus::Acknowledged];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Acknowledged => "acknowledged",
        }
    }

    /// Parse a status name, ignoring ASCII case and surrounding whitespace
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single ingested occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Origin system, lowercased
    pub source: String,
    /// Kind of occurrence, lowercased
    pub event_type: String,
    pub payload: Payload,
    pub status: EventStatus,
    /// Assigned by the store at insert time
    pub created_at: DateTime<Utc>,
    /// Set exactly once, when the event is acknowledged
    #[serde(default)]
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Create a new pending event
    pub fn new(
        id: EventId,
        source: String,
        event_type: String,
        payload: Payload,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            source,
            event_type,
            payload,
            status: EventStatus::Pending,
            created_at,
            acknowledged_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == EventStatus::Pending
    }

    pub fn is_acknowledged(&self) -> bool {
        self.status == EventStatus::Acknowledged
    }
}
