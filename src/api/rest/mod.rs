//! REST API module for HTTP endpoints
//!
//! - `POST   /api/v1/events`           - Ingest an event
//! - `GET    /api/v1/inbox`            - List events by status
//! - `GET    /api/v1/events/:event_id` - Get a single event
//! - `DELETE /api/v1/events/:event_id` - Acknowledge an event

pub mod events;
pub mod inbox;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};

use crate::error::InboxError;
use crate::types::{Event, EventId, EventStatus, Payload};

/// Full view of an event
#[derive(Debug, Serialize)]
pub struct EventDetail {
    pub event_id: EventId,
    pub source: String,
    pub event_type: String,
    pub payload: Payload,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl From<Event> for EventDetail {
    fn from(event: Event) -> Self {
        Self {
            event_id: event.id,
            source: event.source,
            event_type: event.event_type,
            payload: event.payload,
            status: event.status,
            created_at: event.created_at,
            acknowledged_at: event.acknowledged_at,
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            error: message.into(),
            code: code.to_string(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    /// Request that axum could not extract (bad JSON, bad query string)
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, "VALIDATION_ERROR", message)
    }
}

impl From<InboxError> for ApiError {
    fn from(e: InboxError) -> Self {
        match e {
            InboxError::Validation(message) => {
                debug!(reason = %message, "request rejected");
                ApiError::validation(message)
            }
            InboxError::NotFound(id) => {
                debug!(event_id = %id, "event not found");
                ApiError::not_found("Event not found")
            }
            InboxError::Storage(e) => {
                error!(error = %e, "event store failure");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
