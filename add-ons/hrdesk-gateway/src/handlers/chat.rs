//! Chat handlers: ask a question, rate an answer, list and reset a session's history.
//!
//! Sessions are explicit state owned by the gateway (`AppState::sessions`), keyed by a
//! session id the client echoes back. The core engine only ever sees the question, the
//! fallback profile and a knowledge-base snapshot.

use crate::handlers::error_response;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use hrdesk_core::{feedback_ack, resolve, ChatSession, FeedbackError, FeedbackRecord};

const EMPTY_QUESTION_MESSAGE: &str = "Veuillez saisir une question.";

#[derive(serde::Deserialize)]
pub(crate) struct AskRequest {
    question: String,
    /// Profile used when the question names none. Default: first profile of the base.
    #[serde(default)]
    fallback_profile: Option<String>,
    /// Existing session to append to. A new one is created when absent.
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(serde::Deserialize)]
pub(crate) struct FeedbackRequest {
    session_id: String,
    /// History index returned by `/api/v1/ask`.
    entry: usize,
    helpful: bool,
}

/// POST /api/v1/ask – resolves a question and records it in the session history.
pub(crate) async fn ask(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Response {
    if req.question.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, EMPTY_QUESTION_MESSAGE);
    }

    let snapshot = state.knowledge.snapshot();
    let fallback = match req.fallback_profile {
        Some(profile) if snapshot.has_profile(&profile) => profile,
        Some(profile) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("unknown fallback profile '{}'", profile),
            )
        }
        None => match snapshot.default_profile() {
            Some(profile) => profile,
            None => return error_response(StatusCode::SERVICE_UNAVAILABLE, "knowledge base is empty"),
        },
    };

    let result = resolve(&req.question, &fallback, snapshot.records());
    tracing::info!(
        target: "hrdesk::gateway",
        outcome = ?result.outcome,
        used_profile = %result.used_profile,
        confidence = result.confidence,
        "question resolved"
    );

    let session_id = req
        .session_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    if !state.sessions.contains_key(&session_id) {
        evict_idle_sessions(&state.sessions, state.config.max_sessions);
    }
    let entry = state
        .sessions
        .entry(session_id.clone())
        .or_default()
        .record(req.question, result.clone());

    let mut body = serde_json::json!({
        "status": "ok",
        "session_id": session_id,
        "entry": entry,
        "result": result,
    });
    if result.escalate {
        body["contact"] = serde_json::json!(state.config.escalation_contact());
    }
    Json(body).into_response()
}

/// POST /api/v1/feedback – stores a helpful / not-helpful vote for an answered entry.
pub(crate) async fn feedback(State(state): State<AppState>, Json(req): Json<FeedbackRequest>) -> Response {
    // Build the record while holding the session, write to Sled after releasing it.
    let record = {
        let Some(mut session) = state.sessions.get_mut(&req.session_id) else {
            return error_response(StatusCode::NOT_FOUND, format!("unknown session '{}'", req.session_id));
        };
        match session.set_feedback(req.entry, req.helpful) {
            Ok(entry) => FeedbackRecord::now(entry.question.clone(), &entry.result, req.helpful),
            Err(e @ FeedbackError::UnknownEntry(_)) => return error_response(StatusCode::NOT_FOUND, e.to_string()),
            Err(e @ FeedbackError::NotAnswered(_)) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        }
    };

    if let Err(e) = state.feedback.record(&record) {
        tracing::error!(target: "hrdesk::gateway", error = %e, "feedback write failed");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    Json(serde_json::json!({
        "status": "ok",
        "message": feedback_ack(req.helpful),
    }))
    .into_response()
}

/// GET /api/v1/history/:session_id – most recent entries, newest first.
pub(crate) async fn history(State(state): State<AppState>, Path(session_id): Path<String>) -> Response {
    let Some(session) = state.sessions.get(&session_id) else {
        return error_response(StatusCode::NOT_FOUND, format!("unknown session '{}'", session_id));
    };
    Json(serde_json::json!({
        "status": "ok",
        "session_id": session_id,
        "total": session.len(),
        "entries": session.recent(state.config.history_limit),
    }))
    .into_response()
}

/// GET /api/v1/feedback – vote count, helpful ratio and the latest votes.
pub(crate) async fn feedback_summary(State(state): State<AppState>) -> Response {
    let summary = state.feedback.count().and_then(|count| {
        let ratio = state.feedback.helpful_ratio()?;
        let recent = state.feedback.recent(state.config.history_limit)?;
        Ok((count, ratio, recent))
    });
    match summary {
        Ok((count, ratio, recent)) => Json(serde_json::json!({
            "status": "ok",
            "count": count,
            "helpful_ratio": ratio,
            "recent": recent,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(target: "hrdesk::gateway", error = %e, "feedback read failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// POST /api/v1/reset/:session_id – drops a session and its history.
pub(crate) async fn reset(State(state): State<AppState>, Path(session_id): Path<String>) -> Response {
    let Some((_, session)) = state.sessions.remove(&session_id) else {
        return error_response(StatusCode::NOT_FOUND, format!("unknown session '{}'", session_id));
    };
    let cleared = session.len();
    tracing::debug!(target: "hrdesk::gateway", session_id = %session_id, cleared, "session reset");
    Json(serde_json::json!({ "status": "ok", "cleared": cleared })).into_response()
}

/// Removes the least recently active sessions until one more fits under `max_sessions`.
fn evict_idle_sessions(sessions: &DashMap<String, ChatSession>, max_sessions: usize) {
    let max_sessions = max_sessions.max(1);
    while sessions.len() >= max_sessions {
        // The iterator holds shard locks; release it before removing.
        let idle = sessions
            .iter()
            .min_by_key(|entry| entry.value().last_active_ms())
            .map(|entry| entry.key().clone());
        let Some(key) = idle else { break };
        sessions.remove(&key);
        tracing::debug!(target: "hrdesk::gateway", session_id = %key, "idle session evicted");
    }
}
