//! hrdesk-core: HR question answering over a fixed profile/domain/question/answer table.
//!
//! The engine is pure and synchronous: normalize the question, detect profile and domain by
//! keyword, score every candidate record and either answer or escalate to HR staff.
//! Knowledge-base loading, session history and the feedback log live next to it so the
//! gateway keeps a single dependency.

mod engine;
mod feedback;
mod knowledge;
mod session;
mod shared;

// Shared configuration
pub use shared::{CoreConfig, EscalationContact, DEFAULT_MAX_SESSIONS};

// Resolution engine
pub use engine::{
    detect_domain, detect_profile, meets_threshold, normalize, normalize_opt, resolve, similarity,
    Domain, Outcome, Profile, ResolutionResult, CONFIDENCE_THRESHOLD, COVERAGE_BONUS,
    ESCALATION_MESSAGE, SCORE_DIVISOR, STOPWORDS_FR,
};

// Knowledge base
pub use knowledge::{
    KnowledgeBase, KnowledgeBaseError, KnowledgeRecord, KnowledgeStats, SharedKnowledgeBase,
    REQUIRED_COLUMNS,
};

// Caller-held session history
pub use session::{ChatSession, FeedbackError, HistoryEntry, DEFAULT_HISTORY_LIMIT};

// Feedback log
pub use feedback::{feedback_ack, FeedbackRecord, FeedbackStore};
