//! Sled-backed feedback log.
//!
//! Votes are stored for HR staff to review. The resolution engine never reads them, so a
//! vote cannot change future answers.

use crate::engine::ResolutionResult;
use crate::session::now_ms;
use serde::{Deserialize, Serialize};
use sled::Db;
use std::path::Path;
use uuid::Uuid;

const TREE_NAME: &str = "feedback";
const KEY_PREFIX: &str = "feedback/";

/// Acknowledgement shown after a vote.
pub fn feedback_ack(helpful: bool) -> &'static str {
    if helpful {
        "Merci !"
    } else {
        "Merci. Contactez le service RH."
    }
}

/// One helpful / not-helpful vote on an answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Unix timestamp (milliseconds) of the vote.
    pub timestamp_ms: i64,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_question: Option<String>,
    pub used_profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub confidence: f64,
    pub helpful: bool,
}

impl FeedbackRecord {
    /// Builds a vote for `question` and the result it received, stamped now.
    pub fn now(question: impl Into<String>, result: &ResolutionResult, helpful: bool) -> Self {
        Self {
            timestamp_ms: now_ms(),
            question: question.into(),
            matched_question: result.matched_question.clone(),
            used_profile: result.used_profile.clone(),
            domain: result.domain.clone(),
            confidence: result.confidence,
            helpful,
        }
    }

    /// Serializes to JSON bytes for storage.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Deserializes from JSON bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }
}

/// Append-only feedback log in a single Sled tree.
pub struct FeedbackStore {
    db: Db,
}

impl FeedbackStore {
    /// Opens or creates the feedback DB at the given path.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, sled::Error> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Appends a vote. Key format: `feedback/{timestamp_ms:020}_{uuid}` so keys sort by time.
    pub fn record(&self, record: &FeedbackRecord) -> Result<String, sled::Error> {
        let tree = self.db.open_tree(TREE_NAME)?;
        let key = format!("{}{:020}_{}", KEY_PREFIX, record.timestamp_ms, Uuid::new_v4().simple());
        let bytes = record.to_bytes();
        tree.insert(key.as_bytes(), bytes.as_slice())?;
        tracing::info!(
            target: "hrdesk::feedback",
            key = %key,
            helpful = record.helpful,
            used_profile = %record.used_profile,
            bytes = bytes.len(),
            "feedback recorded ({})",
            if record.helpful { "helpful" } else { "not helpful" }
        );
        Ok(key)
    }

    /// Most recent votes, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<FeedbackRecord>, sled::Error> {
        let tree = self.db.open_tree(TREE_NAME)?;
        let mut out = Vec::new();
        for item in tree.scan_prefix(KEY_PREFIX).rev() {
            if out.len() >= limit {
                break;
            }
            let (_, v) = item?;
            if let Some(rec) = FeedbackRecord::from_bytes(&v) {
                out.push(rec);
            }
        }
        Ok(out)
    }

    /// Number of stored votes.
    pub fn count(&self) -> Result<usize, sled::Error> {
        let tree = self.db.open_tree(TREE_NAME)?;
        Ok(tree.len())
    }

    /// Share of helpful votes, or `None` when nothing was recorded yet.
    pub fn helpful_ratio(&self) -> Result<Option<f64>, sled::Error> {
        let tree = self.db.open_tree(TREE_NAME)?;
        let mut total = 0usize;
        let mut helpful = 0usize;
        for item in tree.scan_prefix(KEY_PREFIX) {
            let (_, v) = item?;
            if let Some(rec) = FeedbackRecord::from_bytes(&v) {
                total += 1;
                if rec.helpful {
                    helpful += 1;
                }
            }
        }
        Ok((total > 0).then(|| helpful as f64 / total as f64))
    }
}
