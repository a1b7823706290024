//! Event Store - storage contract for inbox events
//!
//! The `EventStore` trait is the only way the lifecycle service reaches
//! persistence. Implementations must make every operation atomic for the
//! single record it touches.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::types::{Event, EventId, EventStatus, Payload};

/// Default number of replayed status updates that triggers compaction on open
pub const DEFAULT_COMPACT_THRESHOLD: usize = 1000;

/// Configuration for the file-backed EventStore
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    /// Path to the data directory
    pub data_dir: PathBuf,
    /// Status updates replayed on open before the log is compacted (0 disables)
    pub compact_threshold: usize,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
        }
    }
}

impl EventStoreConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Set the compaction threshold
    pub fn with_compact_threshold(mut self, threshold: usize) -> Self {
        self.compact_threshold = threshold;
        self
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to events.jsonl
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join("events.jsonl")
    }

    pub fn should_compact(&self, status_updates: usize) -> bool {
        self.compact_threshold > 0 && status_updates >= self.compact_threshold
    }
}

/// Result type for EventStore operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event not found: {0}")]
    NotFound(EventId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store corrupted: {0}")]
    Corrupted(String),
}

/// Event counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub pending: usize,
    pub acknowledged: usize,
}

impl StoreStats {
    pub fn total(&self) -> usize {
        self.pending + self.acknowledged
    }
}

/// Durable keyed storage for inbox events. Events are never deleted.
pub trait EventStore: Send + Sync {
    /// Persist a new pending event with a fresh id and `created_at = now`
    fn insert(&self, source: String, event_type: String, payload: Payload) -> StoreResult<Event>;

    /// Point lookup. `Ok(None)` when no event has this id.
    fn get(&self, id: &EventId) -> StoreResult<Option<Event>>;

    /// Events with `status`, most recent first, at most `limit` of them
    ///
    /// Events created in the same instant come back latest-inserted first.
    fn list(&self, status: EventStatus, limit: usize) -> StoreResult<Vec<Event>>;

    /// Overwrite status and acknowledgement time of an existing event
    fn update_status(
        &self,
        id: &EventId,
        status: EventStatus,
        acknowledged_at: Option<DateTime<Utc>>,
    ) -> StoreResult<Event>;

    /// Event counts by status
    fn stats(&self) -> StoreResult<StoreStats>;
}
