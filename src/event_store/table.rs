//! In-memory event table shared by every store backend
//!
//! Records are keyed by id. A second ordered index on
//! `(status, created_at, seq)` serves the inbox listing without a scan; `seq`
//! is the insertion counter that breaks `created_at` ties.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::store::{StoreError, StoreResult, StoreStats};
use crate::types::{Event, EventId, EventStatus};

type IndexKey = (EventStatus, DateTime<Utc>, u64);

struct Row {
    event: Event,
    seq: u64,
}

#[derive(Default)]
pub(crate) struct EventTable {
    rows: HashMap<EventId, Row>,
    by_status: BTreeMap<IndexKey, EventId>,
    next_seq: u64,
}

impl EventTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn contains(&self, id: &EventId) -> bool {
        self.rows.contains_key(id)
    }

    /// Draw ids until one is unused
    pub(crate) fn fresh_id(&self) -> EventId {
        loop {
            let id = EventId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Add a new record. Ids are never reused.
    pub(crate) fn insert(&mut self, event: Event) -> StoreResult<()> {
        if self.contains(&event.id) {
            return Err(StoreError::Corrupted(format!(
                "duplicate event id {}",
                event.id
            )));
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        self.by_status
            .insert((event.status, event.created_at, seq), event.id.clone());
        self.rows.insert(event.id.clone(), Row { event, seq });
        Ok(())
    }

    pub(crate) fn get(&self, id: &EventId) -> Option<&Event> {
        self.rows.get(id).map(|row| &row.event)
    }

    pub(crate) fn list(&self, status: EventStatus, limit: usize) -> Vec<Event> {
        let start = (status, DateTime::<Utc>::MIN_UTC, 0);
        let end = (status, DateTime::<Utc>::MAX_UTC, u64::MAX);

        self.by_status
            .range(start..=end)
            .rev()
            .take(limit)
            .filter_map(|(_, id)| self.get(id).cloned())
            .collect()
    }

    /// Apply a status change, keeping the index in step
    pub(crate) fn update_status(
        &mut self,
        id: &EventId,
        status: EventStatus,
        acknowledged_at: Option<DateTime<Utc>>,
    ) -> StoreResult<Event> {
        let row = self
            .rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        self.by_status
            .remove(&(row.event.status, row.event.created_at, row.seq));
        row.event.status = status;
        row.event.acknowledged_at = acknowledged_at;
        self.by_status
            .insert((status, row.event.created_at, row.seq), id.clone());

        Ok(row.event.clone())
    }

    pub(crate) fn stats(&self) -> StoreStats {
        let mut stats = StoreStats::default();
        for row in self.rows.values() {
            match row.event.status {
                EventStatus::Pending => stats.pending += 1,
                EventStatus::Acknowledged => stats.acknowledged += 1,
            }
        }
        stats
    }

    /// All events in insertion order
    pub(crate) fn events_in_order(&self) -> Vec<&Event> {
        let mut rows: Vec<&Row> = self.rows.values().collect();
        rows.sort_by_key(|row| row.seq);
        rows.into_iter().map(|row| &row.event).collect()
    }
}
