//! Time and timestamp utilities

use chrono::{DateTime, Utc};

/// Current UTC time
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Acknowledgement time for an event created at `created_at`
///
/// Never earlier than the creation time, even if the wall clock stepped back.
pub fn acknowledged_at(created_at: DateTime<Utc>) -> DateTime<Utc> {
    now().max(created_at)
}
