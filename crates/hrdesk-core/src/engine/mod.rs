//! Query-resolution engine.
//!
//! | Stage      | Module        | Contract                                             |
//! |------------|---------------|------------------------------------------------------|
//! | Normalize  | `normalizer`  | text → lowercase content tokens (French stopwords out) |
//! | Profile    | `classifier`  | text → first profile whose keyword is a substring     |
//! | Domain     | `classifier`  | text → domain with most keyword hits (stable argmax)  |
//! | Score      | `similarity`  | token overlap + coverage bonus                        |
//! | Resolve    | `resolver`    | filter, score, threshold, answer or escalate          |

mod classifier;
mod normalizer;
mod resolver;
mod similarity;

pub use classifier::{detect_domain, detect_profile, Domain, Profile};
pub use normalizer::{normalize, normalize_opt, STOPWORDS_FR};
pub use resolver::{resolve, Outcome, ResolutionResult, ESCALATION_MESSAGE};
pub use similarity::{meets_threshold, similarity, CONFIDENCE_THRESHOLD, COVERAGE_BONUS, SCORE_DIVISOR};
