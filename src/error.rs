//! Errors surfaced by the inbox operations

use thiserror::Error;

use crate::event_store::StoreError;
use crate::types::EventId;

pub type InboxResult<T> = Result<T, InboxError>;

#[derive(Debug, Error)]
pub enum InboxError {
    /// Out-of-contract input. Rejected back to the caller.
    #[error("{0}")]
    Validation(String),

    #[error("Event not found: {0}")]
    NotFound(EventId),

    /// Durability or connectivity failure in the event store
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl InboxError {
    pub fn validation(message: impl Into<String>) -> Self {
        InboxError::Validation(message.into())
    }
}

impl From<StoreError> for InboxError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => InboxError::NotFound(id),
            other => InboxError::Storage(other),
        }
    }
}
