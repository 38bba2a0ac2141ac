//! Axum router assembly for the bridge.
//!
//! The host router is small: a health check and a 404
//! fallback. The webhook middleware wraps it so that every route, and the
//! fallback, passes through the interception first.

use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use super::middleware::{checkout_webhook_middleware, WebhookState};

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

/// Create the host router.
///
/// # Routes
/// - `GET /health` - Liveness check
/// - anything else - `404`
pub fn host_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(not_found)
}

/// Wrap a host router with checkout webhook interception.
///
/// # Example
///
/// ```ignore
/// let app = with_webhook_interception(host_router(), state);
/// axum::serve(listener, app).await?;
/// ```
pub fn with_webhook_interception(host: Router, state: WebhookState) -> Router {
    host.layer(middleware::from_fn_with_state(state, checkout_webhook_middleware))
}
