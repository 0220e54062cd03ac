//! Knowledge-base handlers: statistics and hot reload.

use crate::handlers::error_response;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// GET /api/v1/kb-stats – counts plus the sorted profile and domain vocabularies.
pub(crate) async fn kb_stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let snapshot = state.knowledge.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "stats": snapshot.stats(),
        "profiles": snapshot.profiles(),
        "domains": snapshot.domains(),
        "default_profile": snapshot.default_profile(),
    }))
}

/// POST /api/v1/reload – re-reads the CSV and swaps the snapshot. On failure the old one stays.
pub(crate) async fn reload(State(state): State<AppState>) -> Response {
    let knowledge = Arc::clone(&state.knowledge);
    let outcome = tokio::task::spawn_blocking(move || knowledge.reload()).await;
    match outcome {
        Ok(Ok(base)) => Json(serde_json::json!({
            "status": "ok",
            "stats": base.stats(),
        }))
        .into_response(),
        Ok(Err(e)) => error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
