//! HR knowledge base: the (profile, domain, question, answer) table the engine searches.
//!
//! ## Source format
//!
//! | Column     | Field      | Notes                                    |
//! |------------|------------|------------------------------------------|
//! | `profil`   | `profile`  | opaque category, compared exactly         |
//! | `domaine`  | `domain`   | opaque category, compared exactly         |
//! | `question` | `question` | reference text, normalized at query time |
//! | `reponse`  | `answer`   | returned verbatim                        |
//!
//! The table is loaded once and never mutated; reloads build a fresh [`KnowledgeBase`] and swap
//! it into a [`SharedKnowledgeBase`].

mod base;
mod snapshot;

pub use base::{KnowledgeBase, KnowledgeBaseError, KnowledgeRecord, KnowledgeStats, REQUIRED_COLUMNS};
pub use snapshot::SharedKnowledgeBase;
