//! Inbox Query Engine
//!
//! Read-only listing of events by status, newest first.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{InboxError, InboxResult};
use crate::event_store::EventStore;
use crate::types::{Event, EventStatus};

/// Limit used when the caller does not give one
pub const DEFAULT_LIMIT: usize = 50;

/// Largest accepted limit
pub const MAX_LIMIT: usize = 1000;

/// Ordered slice of the inbox
#[derive(Debug, Clone, Serialize)]
pub struct InboxPage {
    pub events: Vec<Event>,
    /// Number of events in this page, not in the store
    pub count: usize,
}

/// Reject limits outside `1..=MAX_LIMIT`
pub fn check_limit(limit: i64) -> InboxResult<usize> {
    usize::try_from(limit)
        .ok()
        .filter(|limit| (1..=MAX_LIMIT).contains(limit))
        .ok_or_else(|| {
            InboxError::validation(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            ))
        })
}

/// Read-only view over the event store
#[derive(Clone)]
pub struct InboxQuery {
    store: Arc<dyn EventStore>,
}

impl InboxQuery {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Up to `limit` events with `status`, most recent first
    pub fn query(&self, status: EventStatus, limit: i64) -> InboxResult<InboxPage> {
        let limit = check_limit(limit)?;
        let events = self.store.list(status, limit)?;
        Ok(InboxPage {
            count: events.len(),
            events,
        })
    }

    /// Pending events with the default limit
    pub fn pending(&self) -> InboxResult<InboxPage> {
        self.query(EventStatus::Pending, DEFAULT_LIMIT as i64)
    }
}
