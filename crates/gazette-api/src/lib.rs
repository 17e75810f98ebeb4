//! # gazette-api
//!
//! Admin HTTP surface for the Gazette log engine: the three
//! `/api/admin/logs` operations behind a bearer-token gate, plus a request
//! logger that feeds `http_request` events back into the same store.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use gazette_engine::LogQueryEngine;
use gazette_store::LogStore;

pub mod handlers;
pub mod middleware;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: LogQueryEngine,
    pub store: Arc<dyn LogStore>,
    pub admin_token: String,
}

impl AppState {
    pub fn new(store: Arc<dyn LogStore>, admin_token: String) -> Self {
        Self {
            engine: LogQueryEngine::new(store.clone()),
            store,
            admin_token,
        }
    }
}

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation when debugging production incidents.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Build the application router.
///
/// The admin routes sit behind the bearer-token gate; every request,
/// including unauthorized ones, passes through the request logger so the
/// log itself reflects real traffic.
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/admin/logs", get(handlers::list_logs))
        .route("/api/admin/logs/stats", get(handlers::log_stats))
        .route("/api/admin/logs/clear", delete(handlers::clear_logs))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(admin_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::log_requests,
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
