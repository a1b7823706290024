//! Non-durable event store for tests and throwaway runs

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::store::{EventStore, StoreResult, StoreStats};
use super::table::EventTable;
use crate::types::{Event, EventId, EventStatus, Payload};
use crate::utils;

/// Event store that keeps everything in process memory
#[derive(Default)]
pub struct MemoryEventStore {
    table: RwLock<EventTable>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryEventStore {
    fn insert(&self, source: String, event_type: String, payload: Payload) -> StoreResult<Event> {
        let mut table = self.table.write();
        let event = Event::new(table.fresh_id(), source, event_type, payload, utils::now());
        table.insert(event.clone())?;
        Ok(event)
    }

    fn get(&self, id: &EventId) -> StoreResult<Option<Event>> {
        Ok(self.table.read().get(id).cloned())
    }

    fn list(&self, status: EventStatus, limit: usize) -> StoreResult<Vec<Event>> {
        Ok(self.table.read().list(status, limit))
    }

    fn update_status(
        &self,
        id: &EventId,
        status: EventStatus,
        acknowledged_at: Option<DateTime<Utc>>,
    ) -> StoreResult<Event> {
        self.table.write().update_status(id, status, acknowledged_at)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        Ok(self.table.read().stats())
    }
}
