// HTTP request handlers for the registry API

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app_state::SharedState;
use crate::dispatch::dispatch;
use crate::registry;

/// Build the full application router over a shared state handle
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/rpc", post(rpc))
        .route("/describe", get(describe).post(describe))
        .fallback(not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// ===== RPC ENDPOINT =====

/// POST /rpc
/// Body keys name the methods to run, values are their parameter objects.
/// Always answers JSON on success, a short error body on request failure.
pub async fn rpc(State(state): State<SharedState>, body: String) -> Response {
    let request_id = Uuid::new_v4().simple().to_string();
    debug!(%request_id, bytes = body.len(), "rpc request received");

    match dispatch(&state, &body).await {
        Ok(response) => {
            debug!(%request_id, "rpc request settled");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            warn!(%request_id, error = ?err, "rpc request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

// ===== DISCOVERY ENDPOINT =====

/// GET|POST /describe
/// Self-description of the whole method surface. Executors never appear
/// here, only the descriptive fields.
pub async fn describe() -> Json<Value> {
    Json(json!({
        "types": registry::describe_types(),
        "methods": registry::describe_methods(),
    }))
}

// ===== FALLBACK =====

/// Anything that is not /rpc or /describe
pub async fn not_found(uri: Uri) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("no route for {}", uri.path()),
    )
}
