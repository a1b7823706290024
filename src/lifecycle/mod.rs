//! Event Lifecycle Service
//!
//! The only component that mutates events. It validates input, normalizes
//! names and drives the single transition of the state machine:
//!
//! ```text
//!   ingest ──► pending ──acknowledge──► acknowledged (terminal)
//! ```
//!
//! Acknowledging an event that is already acknowledged succeeds without
//! touching the store and reports the original `acknowledged_at`.

mod validation;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

pub use validation::{normalize_name, require_object};

use crate::error::{InboxError, InboxResult};
use crate::event_store::EventStore;
use crate::types::{Event, EventId, EventStatus};
use crate::utils::time;

/// Confirmation returned with every ingested event
pub const INGESTED_MESSAGE: &str = "Event successfully ingested";

/// Result of a successful ingest
#[derive(Debug, Clone)]
pub struct Ingested {
    pub event: Event,
    pub message: &'static str,
}

/// Result of a successful acknowledge
#[derive(Debug, Clone)]
pub struct Acknowledgement {
    pub event: Event,
    /// True when the event had been acknowledged before this call
    pub repeated: bool,
}

impl Acknowledgement {
    pub fn acknowledged_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.event.acknowledged_at
    }
}

/// Validates and applies event state changes on top of an `EventStore`
#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn EventStore>,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// The store this service writes to
    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Create a pending event
    ///
    /// `source` and `event_type` must contain something other than
    /// whitespace and are lowercased; `payload` must be a JSON object.
    pub fn ingest(&self, source: &str, event_type: &str, payload: Value) -> InboxResult<Ingested> {
        let source = normalize_name("source", source)?;
        let event_type = normalize_name("event_type", event_type)?;
        let payload = require_object(payload)?;

        let event = self.store.insert(source, event_type, payload)?;
        info!(
            event_id = %event.id,
            source = %event.source,
            event_type = %event.event_type,
            "event ingested"
        );

        Ok(Ingested {
            event,
            message: INGESTED_MESSAGE,
        })
    }

    /// Mark an event as processed
    pub fn acknowledge(&self, id: &EventId) -> InboxResult<Acknowledgement> {
        let event = self.get(id)?;

        if event.is_acknowledged() {
            debug!(event_id = %id, "event already acknowledged");
            return Ok(Acknowledgement {
                event,
                repeated: true,
            });
        }

        let acknowledged_at = time::acknowledged_at(event.created_at);
        let event = self
            .store
            .update_status(id, EventStatus::Acknowledged, Some(acknowledged_at))?;
        info!(event_id = %id, "event acknowledged");

        Ok(Acknowledgement {
            event,
            repeated: false,
        })
    }

    /// Look up a single event
    pub fn get(&self, id: &EventId) -> InboxResult<Event> {
        self.store
            .get(id)?
            .ok_or_else(|| InboxError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::MemoryEventStore;
    use serde_json::json;

    fn service() -> LifecycleService {
        LifecycleService::new(Arc::new(MemoryEventStore::new()))
    }

    #[test]
    fn test_ingest_creates_pending_event() {
        let service = service();
        let ingested = service
            .ingest("test", "test.event", json!({"message": "test payload"}))
            .unwrap();

        assert_eq!(ingested.message, INGESTED_MESSAGE);
        assert_eq!(ingested.event.status, EventStatus::Pending);
        assert!(ingested.event.id.as_str().starts_with("evt_"));
        assert!(ingested.event.acknowledged_at.is_none());
    }

    #[test]
    fn test_ingest_normalizes_case() {
        let service = service();
        let ingested = service
            .ingest("UPPERCASE", "TEST.EVENT", json!({"test": "data"}))
            .unwrap();

        let stored = service.get(&ingested.event.id).unwrap();
        assert_eq!(stored.source, "uppercase");
        assert_eq!(stored.event_type, "test.event");
    }

    #[test]
    fn test_ingest_rejects_blank_fields() {
        let service = service();

        let err = service.ingest("", "test.event", json!({})).unwrap_err();
        assert_eq!(err.to_string(), "source cannot be empty");

        let err = service.ingest("test", "   ", json!({})).unwrap_err();
        assert_eq!(err.to_string(), "event_type cannot be empty");

        assert_eq!(service.store().stats().unwrap().total(), 0);
    }

    #[test]
    fn test_ingest_rejects_non_object_payload() {
        let service = service();
        let err = service.ingest("test", "test.event", json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, InboxError::Validation(_)));
    }

    #[test]
    fn test_ids_are_unique() {
        let service = service();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..100 {
            let ingested = service.ingest("s", "t", json!({})).unwrap();
            assert!(ids.insert(ingested.event.id));
        }
    }

    #[test]
    fn test_acknowledge_transitions_status() {
        let service = service();
        let created = service.ingest("lifecycle", "test.lifecycle", json!({"step": "create"})).unwrap().event;

        let ack = service.acknowledge(&created.id).unwrap();
        assert!(!ack.repeated);
        assert_eq!(ack.event.status, EventStatus::Acknowledged);
        let acknowledged_at = ack.acknowledged_at().unwrap();
        assert!(acknowledged_at >= created.created_at);

        let stored = service.get(&created.id).unwrap();
        assert_eq!(stored.status, EventStatus::Acknowledged);
        assert_eq!(stored.acknowledged_at, Some(acknowledged_at));
    }

    #[test]
    fn test_repeat_acknowledge_keeps_original_time() {
        let service = service();
        let created = service.ingest("s", "t", json!({})).unwrap().event;

        let first = service.acknowledge(&created.id).unwrap();
        let second = service.acknowledge(&created.id).unwrap();

        assert!(second.repeated);
        assert_eq!(second.event.status, EventStatus::Acknowledged);
        assert_eq!(second.acknowledged_at(), first.acknowledged_at());
    }

    #[test]
    fn test_missing_event() {
        let service = service();
        let id = EventId::from("evt_nonexistent");

        assert!(matches!(service.get(&id), Err(InboxError::NotFound(_))));
        assert!(matches!(service.acknowledge(&id), Err(InboxError::NotFound(_))));
    }
}
