use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::AppState;

/// GET /health
/// Reports poller progress. Always 200: a failing status source is a
/// degraded dashboard, not a dead one.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let stats = state.stats.read().await.clone();
    let elements = state.render.read().await.len();

    let status = if stats.last_error.is_none() {
        "ok"
    } else {
        "degraded"
    };

    let response = json!({
        "status": status,
        "polls": stats.polls,
        "failures": stats.failures,
        "last_success": stats.last_success,
        "last_error": stats.last_error,
        "elements": elements,
    });

    (StatusCode::OK, Json(response))
}
