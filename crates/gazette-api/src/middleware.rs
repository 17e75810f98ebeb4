//! Admin gate and request-logging middleware.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::debug;

use crate::AppState;

/// Reject requests that do not carry the configured admin bearer token.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == state.admin_token);

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "Admin access required" })),
        )
            .into_response();
    }

    next.run(request).await
}

/// Append one `http_request` record per request to the event log.
///
/// These records are hidden from the default listing and excluded from
/// statistics as noise, but remain inspectable with `showHttp=true`. Append
/// failures are swallowed: the log is an observability aid, never a reason
/// to fail the request being observed.
pub async fn log_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let url = request.uri().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let record = serde_json::json!({
        "timestamp": Utc::now().to_rfc3339(),
        "level": "info",
        "type": "http_request",
        "method": method,
        "url": url,
        "status": response.status().as_u16(),
        "duration": started.elapsed().as_millis() as u64,
    });
    if let Err(e) = state.store.append(&record.to_string()).await {
        debug!(error = %e, "Failed to append http_request record");
    }

    response
}
