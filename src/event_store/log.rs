//! Records of the append-only event log (`events.jsonl`)
//!
//! One JSON object per line. A record either introduces an event or
//! changes the status of one introduced earlier in the file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Event, EventId, EventStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LogRecord {
    /// A new event, with its full state at write time
    Inserted { event: Event },
    /// Status change of an existing event
    StatusUpdated {
        id: EventId,
        status: EventStatus,
        acknowledged_at: Option<DateTime<Utc>>,
    },
}

impl LogRecord {
    /// Serialize record to JSON string (for JSONL)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize record from one raw log line
    pub fn from_json_line(line: impl AsRef<[u8]>) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(line.as_ref())
    }
}
