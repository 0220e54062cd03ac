//! Caller-held chat history. Created at session start, appended per query, cleared on reset.

use crate::engine::ResolutionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of entries shown by default when listing a session's history.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// One question asked in a session and what the engine answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Position in the session, stable until the next `clear`.
    pub index: usize,
    pub question: String,
    pub result: ResolutionResult,
    /// `Some(true)` helpful, `Some(false)` not helpful, `None` no vote yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<bool>,
    /// Unix timestamp (milliseconds) when the question was asked.
    pub asked_at_ms: i64,
}

/// Why a feedback vote was not attached to a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackError {
    /// No entry with that index in the session.
    UnknownEntry(usize),
    /// Only answered questions can be rated.
    NotAnswered(usize),
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntry(i) => write!(f, "no history entry {}", i),
            Self::NotAnswered(i) => write!(f, "history entry {} has no answer to rate", i),
        }
    }
}

impl std::error::Error for FeedbackError {}

/// Ordered history of one user's questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatSession {
    entries: Vec<HistoryEntry>,
}

pub(crate) fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resolved question; returns its index.
    pub fn record(&mut self, question: impl Into<String>, result: ResolutionResult) -> usize {
        let index = self.entries.len();
        self.entries.push(HistoryEntry {
            index,
            question: question.into(),
            result,
            feedback: None,
            asked_at_ms: now_ms(),
        });
        index
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(limit).collect()
    }

    /// Timestamp of the latest question, or 0 for an empty session.
    pub fn last_active_ms(&self) -> i64 {
        self.entries.last().map(|e| e.asked_at_ms).unwrap_or(0)
    }

    /// Attaches a helpful / not-helpful vote to an answered entry. A second vote overwrites the first.
    pub fn set_feedback(&mut self, index: usize, helpful: bool) -> Result<&HistoryEntry, FeedbackError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(FeedbackError::UnknownEntry(index))?;
        if !entry.result.is_answered() {
            return Err(FeedbackError::NotAnswered(index));
        }
        entry.feedback = Some(helpful);
        Ok(entry)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
