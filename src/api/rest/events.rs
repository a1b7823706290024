//! Event endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, EventDetail};
use crate::api::state::AppState;
use crate::types::{EventId, EventStatus};

/// Status reported for a freshly ingested event
pub const RECEIVED_STATUS: &str = "received";

/// Body of POST /api/v1/events
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Sending system, e.g. "stripe" or "gmail"
    pub source: String,
    /// Kind of event, e.g. "payment.succeeded"
    pub event_type: String,
    /// JSON object with the event data
    pub payload: Value,
}

/// Response for POST /api/v1/events
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub event_id: EventId,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    pub message: &'static str,
}

/// Response for DELETE /api/v1/events/:event_id
#[derive(Debug, Serialize)]
pub struct AcknowledgeResponse {
    pub event_id: EventId,
    pub status: EventStatus,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

/// POST /api/v1/events - Ingest a new event
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let Json(request) = body.map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

    let ingested = state
        .lifecycle
        .ingest(&request.source, &request.event_type, request.payload)?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            event_id: ingested.event.id,
            status: RECEIVED_STATUS,
            created_at: ingested.event.created_at,
            message: ingested.message,
        }),
    ))
}

/// GET /api/v1/events/:event_id - Get a single event
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<EventDetail>, ApiError> {
    let event = state.lifecycle.get(&EventId::from(event_id))?;
    Ok(Json(event.into()))
}

/// DELETE /api/v1/events/:event_id - Acknowledge an event
pub async fn acknowledge_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<AcknowledgeResponse>, ApiError> {
    let ack = state.lifecycle.acknowledge(&EventId::from(event_id))?;

    Ok(Json(AcknowledgeResponse {
        acknowledged_at: ack.acknowledged_at(),
        event_id: ack.event.id,
        status: ack.event.status,
    }))
}
