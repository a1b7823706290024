//! HTTP API tests driven through the axum router

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

use event_inbox::api::{create_router, AppState};
use event_inbox::{EventStoreConfig, FileEventStore, MemoryEventStore};

fn app() -> Router {
    create_router(Arc::new(AppState::new(Arc::new(MemoryEventStore::new()))))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn create(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/v1/events", Some(body)).await
}

fn inbox_ids(body: &Value) -> Vec<String> {
    body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event_id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_event() {
    let app = app();
    let (status, body) = create(
        &app,
        json!({"source": "test", "event_type": "test.event", "payload": {"message": "test payload"}}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["event_id"].as_str().unwrap().starts_with("evt_"));
    assert_eq!(body["status"], "received");
    assert_eq!(body["message"], "Event successfully ingested");
    assert!(body.get("created_at").is_some());
}

#[tokio::test]
async fn test_create_event_validation() {
    let app = app();

    let (status, body) = create(
        &app,
        json!({"source": "", "event_type": "test.event", "payload": {}}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "source cannot be empty");

    let (status, _) = create(
        &app,
        json!({"source": "test", "event_type": "test.event", "payload": [1, 2]}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Missing payload never reaches the service
    let (status, _) = create(&app, json!({"source": "test", "event_type": "test.event"})).await;
    assert!(status.is_client_error());

    let (_, inbox) = send(&app, Method::GET, "/api/v1/inbox", None).await;
    assert_eq!(inbox["total"], 0);
}

#[tokio::test]
async fn test_get_inbox_shape() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/inbox", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["events"].is_array());
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_event_lifecycle() {
    let app = app();
    let (_, created) = create(
        &app,
        json!({"source": "lifecycle", "event_type": "test.lifecycle", "payload": {"step": "create"}}),
    )
    .await;
    let event_id = created["event_id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/events/{}", event_id);

    let (status, event) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["event_id"], event_id.as_str());
    assert_eq!(event["status"], "pending");
    assert_eq!(event["payload"], json!({"step": "create"}));
    assert!(event["acknowledged_at"].is_null());

    let (status, ack) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "acknowledged");
    assert_eq!(ack["event_id"], event_id.as_str());
    assert!(ack["acknowledged_at"].is_string());

    let (_, event) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(event["status"], "acknowledged");
    assert_eq!(event["acknowledged_at"], ack["acknowledged_at"]);

    // Repeat acknowledge returns the same time
    let (status, again) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["acknowledged_at"], ack["acknowledged_at"]);
}

#[tokio::test]
async fn test_nonexistent_event() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/v1/events/evt_nonexistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::DELETE, "/api/v1/events/evt_nonexistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inbox_with_limit() {
    let app = app();
    for i in 0..5 {
        let (status, _) = create(
            &app,
            json!({"source": "test", "event_type": "pagination.test", "payload": {"index": i}}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/api/v1/inbox?limit=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let indexes: Vec<i64> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["payload"]["index"].as_i64().unwrap())
        .collect();
    assert_eq!(indexes, vec![4, 3, 2]);
}

#[tokio::test]
async fn test_inbox_rejects_bad_params() {
    let app = app();

    for uri in [
        "/api/v1/inbox?limit=0",
        "/api/v1/inbox?limit=1001",
        "/api/v1/inbox?limit=-3",
        "/api/v1/inbox?status=bogus",
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let (status, _) = send(&app, Method::GET, "/api/v1/inbox?limit=ten", None).await;
    assert!(status.is_client_error());

    let (status, _) = send(&app, Method::GET, "/api/v1/inbox?limit=1000&status=ACKNOWLEDGED", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_end_to_end_polling() {
    let app = app();

    let (status, created) = create(
        &app,
        json!({"source": "stripe", "event_type": "payment.succeeded", "payload": {"amount": 100}}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "received");
    let event_id = created["event_id"].as_str().unwrap().to_string();

    let (_, inbox) = send(&app, Method::GET, "/api/v1/inbox?status=pending", None).await;
    assert!(inbox_ids(&inbox).contains(&event_id));

    let (_, ack) = send(&app, Method::DELETE, &format!("/api/v1/events/{}", event_id), None).await;
    assert_eq!(ack["status"], "acknowledged");

    let (_, inbox) = send(&app, Method::GET, "/api/v1/inbox", None).await;
    assert!(!inbox_ids(&inbox).contains(&event_id));

    let (_, acked) = send(&app, Method::GET, "/api/v1/inbox?status=acknowledged", None).await;
    assert_eq!(inbox_ids(&acked), vec![event_id]);
}

#[tokio::test]
async fn test_health_reports_counts_with_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileEventStore::open(EventStoreConfig::new(temp_dir.path())).unwrap();
    let app = create_router(Arc::new(AppState::new(Arc::new(store))));

    create(&app, json!({"source": "a", "event_type": "b", "payload": {}})).await;
    let (_, created) = create(&app, json!({"source": "a", "event_type": "c", "payload": {}})).await;
    let uri = format!("/api/v1/events/{}", created["event_id"].as_str().unwrap());
    send(&app, Method::DELETE, &uri, None).await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["events"], json!({"pending": 1, "acknowledged": 1}));
}
