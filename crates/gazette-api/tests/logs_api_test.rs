//! Integration tests for the admin log endpoints: auth gating, response
//! shapes, and the request logger feeding the store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use gazette_api::{build_router, AppState};
use gazette_store::{FileLogStore, LogStore, MemoryLogStore};

const TOKEN: &str = "test-admin-token";

fn app_with(lines: Vec<String>) -> (axum::Router, Arc<MemoryLogStore>) {
    let store = Arc::new(MemoryLogStore::with_lines(lines));
    let state = AppState::new(store.clone(), TOKEN.to_string());
    (build_router(state), store)
}

fn seed_lines() -> Vec<String> {
    vec![
        json!({ "type": "login_success", "level": "info", "userId": 1, "timestamp": "2024-01-01T00:00:00Z" }).to_string(),
        json!({ "type": "http_request", "level": "info", "timestamp": "2024-01-01T00:00:01Z" }).to_string(),
        json!({ "type": "article_created", "level": "info", "userId": 1, "timestamp": "2024-01-01T00:00:02Z" }).to_string(),
    ]
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_is_open() {
    let (app, _) = app_with(vec![]);
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_reject_missing_token() {
    let (app, _) = app_with(seed_lines());
    let response = app
        .oneshot(get("/api/admin/logs", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Admin access required");
}

#[tokio::test]
async fn test_admin_routes_reject_wrong_token() {
    let (app, _) = app_with(seed_lines());
    let response = app
        .oneshot(get("/api/admin/logs/stats", Some("wrong")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_logs_response_shape() {
    let (app, _) = app_with(seed_lines());
    let response = app
        .oneshot(get("/api/admin/logs", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["logs"].is_array());
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["pagination"]["limit"], 100);
    assert_eq!(body["pagination"]["offset"], 0);
    assert_eq!(body["pagination"]["hasMore"], false);
    assert_eq!(body["summary"]["showing"], 2);
    // Defaults hide the http_request record
    assert_eq!(body["logs"][0]["type"], "article_created");
    assert_eq!(body["logs"][1]["type"], "login_success");
}

#[tokio::test]
async fn test_list_logs_honors_query_parameters() {
    let (app, _) = app_with(seed_lines());
    let response = app
        .oneshot(get(
            "/api/admin/logs?actionOnly=false&showHttp=true&limit=1&offset=1",
            Some(TOKEN),
        ))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["hasMore"], true);
    assert_eq!(body["logs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stats_response_shape() {
    let (app, _) = app_with(seed_lines());
    let response = app
        .oneshot(get("/api/admin/logs/stats", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["rawTotal"], 3);
    assert_eq!(body["total"], 2);
    assert_eq!(body["totalArticlesCreated"], 1);
    assert_eq!(body["totalLogins"], 1);
    assert_eq!(body["summary"]["noiseRemoved"], 1);
}

#[tokio::test]
async fn test_clear_logs_truncates_store() {
    let (app, store) = app_with(seed_lines());
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/admin/logs/clear")
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .header("x-admin-user", "ops@gazette")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "All logs cleared");

    // Only the http_request record appended for this very request remains
    let remaining = store.read_all().await.unwrap();
    assert!(remaining
        .iter()
        .all(|l| l.contains("\"http_request\"")));
}

#[tokio::test]
async fn test_store_read_failure_returns_generic_error() {
    // A directory as the log path makes every read fail with an I/O error.
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileLogStore::new(dir.path()));
    let app = build_router(AppState::new(store, TOKEN.to_string()));

    let response = app
        .clone()
        .oneshot(get("/api/admin/logs", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    // The caller gets a generic body; the I/O detail stays server-side
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to process log request");

    let response = app
        .oneshot(get("/api/admin/logs/stats", Some(TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to process log request");
}

#[tokio::test]
async fn test_store_truncate_failure_returns_generic_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileLogStore::new(dir.path()));
    let app = build_router(AppState::new(store, TOKEN.to_string()));

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/admin/logs/clear")
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to process log request");
}

#[tokio::test]
async fn test_request_logger_appends_http_records() {
    let (app, store) = app_with(vec![]);
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let lines = store.read_all().await.unwrap();
    assert_eq!(lines.len(), 1);
    let record: Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(record["type"], "http_request");
    assert_eq!(record["method"], "GET");
    assert_eq!(record["url"], "/health");
    assert_eq!(record["status"], 200);
    assert!(record["duration"].is_number());
}
