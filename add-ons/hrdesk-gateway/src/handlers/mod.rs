//! HTTP handlers grouped by concern.

pub(crate) mod chat;
pub(crate) mod knowledge;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// JSON error body used by every handler: `{ "status": "error", "error": "..." }`.
pub(crate) fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "status": "error",
            "error": error.into(),
        })),
    )
        .into_response()
}
