//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::rest::{events, inbox, ApiError};
use super::state::AppState;

/// Service name reported by `/health`
pub const SERVICE_NAME: &str = "event-inbox";

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/v1/events", post(events::create_event))
        .route(
            "/api/v1/events/:event_id",
            get(events::get_event).delete(events::acknowledge_event),
        )
        .route("/api/v1/inbox", get(inbox::get_inbox))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Service info
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Event Inbox API",
        "version": crate::VERSION,
        "status": "operational",
        "endpoints": [
            "POST /api/v1/events",
            "GET /api/v1/inbox",
            "GET /api/v1/events/{event_id}",
            "DELETE /api/v1/events/{event_id}",
        ],
    }))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let stats = state.store().stats().map_err(crate::error::InboxError::from)?;

    Ok(Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "events": stats,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_store::MemoryEventStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn app() -> Router {
        let state = Arc::new(AppState::new(Arc::new(MemoryEventStore::new())));
        create_router(state)
    }

    async fn get_json(app: Router, uri: &str) -> (u16, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = get_json(app(), "/health").await;

        assert_eq!(status, 200);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
        assert_eq!(body["events"]["pending"], 0);
    }

    #[tokio::test]
    async fn test_root_endpoint() {
        let (status, body) = get_json(app(), "/").await;

        assert_eq!(status, 200);
        assert_eq!(body["message"], "Event Inbox API");
        assert_eq!(body["status"], "operational");
        assert!(body.get("version").is_some());
    }
}
