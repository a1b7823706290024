//! Inbox endpoint

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, EventDetail};
use crate::api::state::AppState;
use crate::error::InboxError;
use crate::inbox::DEFAULT_LIMIT;
use crate::types::EventStatus;

/// Query parameters for GET /api/v1/inbox
#[derive(Debug, Deserialize)]
pub struct InboxParams {
    /// Status to filter by (default: "pending")
    pub status: Option<String>,
    /// Maximum number of events to return (default: 50, max: 1000)
    pub limit: Option<i64>,
}

/// Response for GET /api/v1/inbox
#[derive(Debug, Serialize)]
pub struct InboxResponse {
    pub events: Vec<EventDetail>,
    pub total: usize,
}

/// GET /api/v1/inbox - List events, newest first
pub async fn get_inbox(
    State(state): State<Arc<AppState>>,
    params: Result<Query<InboxParams>, QueryRejection>,
) -> Result<Json<InboxResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;

    let status = match params.status.as_deref() {
        None => EventStatus::Pending,
        Some(value) => EventStatus::parse(value).ok_or_else(|| {
            InboxError::validation(format!(
                "status must be 'pending' or 'acknowledged', got '{}'",
                value
            ))
        })?,
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT as i64);

    let page = state.inbox.query(status, limit)?;

    Ok(Json(InboxResponse {
        total: page.count,
        events: page.events.into_iter().map(EventDetail::from).collect(),
    }))
}
