//! Request handlers and error → response mapping.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{error, info};

use gazette_engine::ListLogsParams;

use crate::AppState;

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /api/admin/logs` — filtered, paginated, newest-first listing.
pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<ListLogsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.engine.list_logs(&params).await?;
    Ok(Json(response))
}

/// `GET /api/admin/logs/stats` — aggregate statistics, no parameters.
pub async fn log_stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = state.engine.stats().await?;
    Ok(Json(report))
}

/// `DELETE /api/admin/logs/clear` — irreversible full clear.
///
/// The acting admin may identify themselves with an `x-admin-user` header;
/// the audit entry falls back to the literal `admin` otherwise.
pub async fn clear_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let actor = headers
        .get("x-admin-user")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("admin");
    state.engine.clear_logs(actor).await?;
    info!(actor, "Log clear acknowledged");
    Ok(Json(serde_json::json!({
        "message": "All logs cleared"
    })))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// Engine failure surfaced to the caller. The response body is always
/// generic; the specific failure is an operator concern, not a caller one.
#[derive(Debug)]
pub struct ApiError(gazette_core::Error);

impl From<gazette_core::Error> for ApiError {
    fn from(err: gazette_core::Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        error!(error = %self.0, "Log engine operation failed");

        let body = Json(serde_json::json!({
            "error": "Failed to process log request",
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
