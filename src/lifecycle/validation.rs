//! Input checks applied before an event reaches the store

use serde_json::Value;

use crate::error::{InboxError, InboxResult};
use crate::types::Payload;

/// Reject blank names and lowercase the rest
///
/// Only the emptiness check trims; the stored value keeps any surrounding
/// whitespace the caller sent.
pub fn normalize_name(field: &str, value: &str) -> InboxResult<String> {
    if value.trim().is_empty() {
        return Err(InboxError::validation(format!("{} cannot be empty", field)));
    }
    Ok(value.to_lowercase())
}

/// Accept only JSON objects as payloads
pub fn require_object(payload: Value) -> InboxResult<Payload> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(InboxError::validation("payload must be a JSON object")),
    }
}
