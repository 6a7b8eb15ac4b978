//! HTTP handlers: the one-shot request/response RPC binding and the health
//! check.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::rpc::CallContext;
use crate::ui::state::AppState;

/// JSON-RPC endpoint: one request envelope per POST body.
///
/// The transport's own request lifecycle bounds the call, so no timeout is
/// needed here. Notifications yield an empty body with 204 No Content;
/// malformed bodies yield an error envelope, never a transport error.
pub async fn rpc_handler(State(state): State<Arc<AppState>>, body: String) -> Response {
    // HTTP carries no connection identity
    match state
        .dispatcher
        .dispatch_raw(&body, CallContext::anonymous())
        .await
    {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
