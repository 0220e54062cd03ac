//! Bag-of-words similarity between a query and a candidate question.

use std::collections::HashSet;

/// Multiplier applied to the overlap ratio.
pub const COVERAGE_BONUS: f64 = 2.0;

/// Raw scores are divided by this to produce a confidence in [0, 1].
pub const SCORE_DIVISOR: f64 = 10.0;

/// Minimum raw score required to answer instead of escalating.
pub const CONFIDENCE_THRESHOLD: f64 = 2.0;

/// Scores `query` against `candidate`: shared distinct tokens plus a coverage bonus.
///
/// `score = common + COVERAGE_BONUS * common / max(|query|, |candidate|)`, where sizes are
/// distinct-token counts. Either side empty scores 0. The result is unbounded above.
pub fn similarity(query: &[String], candidate: &[String]) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return 0.0;
    }
    let query_set: HashSet<&str> = query.iter().map(String::as_str).collect();
    let candidate_set: HashSet<&str> = candidate.iter().map(String::as_str).collect();

    let common = query_set.intersection(&candidate_set).count() as f64;
    let widest = query_set.len().max(candidate_set.len()) as f64;

    common + (common / widest) * COVERAGE_BONUS
}

/// True when a raw score is high enough to trust the match.
#[inline]
pub fn meets_threshold(score: f64) -> bool {
    score >= CONFIDENCE_THRESHOLD
}
