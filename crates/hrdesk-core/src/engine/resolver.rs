//! Resolution: pick the best knowledge-base answer for a question, or escalate.

use super::classifier::{detect_domain, detect_profile, Profile};
use super::normalizer::normalize;
use super::similarity::{meets_threshold, similarity, SCORE_DIVISOR};
use crate::knowledge::KnowledgeRecord;
use serde::{Deserialize, Serialize};

/// Message returned with every escalated result.
pub const ESCALATION_MESSAGE: &str =
    "Je ne trouve pas de réponse adaptée. Veuillez contacter le service RH pour une assistance personnalisée.";

const TOO_SHORT_MESSAGE: &str = "Veuillez poser une question plus détaillée.";

fn no_profile_data_message(profile: &str) -> String {
    format!("Aucune information disponible pour le profil '{}'.", profile)
}

/// Which branch of the resolution produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A record scored at or above the threshold.
    Answered,
    /// The knowledge base has no record for the profile in use.
    NoProfileData,
    /// Nothing left of the question after normalization.
    QuestionTooShort,
    /// Best score below the threshold; hand over to HR staff.
    Escalated,
}

/// Result of one resolution. Not persisted by the core.
///
/// `answer` and `message` are mutually exclusive; `escalate` implies no answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub answer: Option<String>,
    pub message: Option<String>,
    pub domain: Option<String>,
    /// Knowledge-base question that produced the answer.
    pub matched_question: Option<String>,
    /// Raw score / 10, capped at 1.
    pub confidence: f64,
    /// Profile found in the question text, if any keyword matched.
    pub detected_profile: Option<Profile>,
    /// Detected profile label, else the caller's fallback.
    pub used_profile: String,
    pub escalate: bool,
    pub outcome: Outcome,
}

impl ResolutionResult {
    fn unanswered(
        outcome: Outcome,
        message: String,
        domain: Option<String>,
        confidence: f64,
        detected_profile: Option<Profile>,
        used_profile: &str,
    ) -> Self {
        Self {
            answer: None,
            message: Some(message),
            domain,
            matched_question: None,
            confidence,
            detected_profile,
            used_profile: used_profile.to_string(),
            escalate: outcome == Outcome::Escalated,
            outcome,
        }
    }

    /// True when the result carries an answer.
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

/// Resolves `question` against `knowledge_base`.
///
/// `fallback_profile` is used when no profile keyword appears in the question; the caller is
/// expected to pick it among the profiles present in the base. Never fails: every degenerate
/// input maps to an unanswered result.
pub fn resolve(question: &str, fallback_profile: &str, knowledge_base: &[KnowledgeRecord]) -> ResolutionResult {
    let detected_profile = detect_profile(question);
    let used_profile = detected_profile.map(|p| p.label()).unwrap_or(fallback_profile);
    let detected_domain = detect_domain(question).map(|d| d.label().to_string());

    let by_profile: Vec<&KnowledgeRecord> = knowledge_base
        .iter()
        .filter(|r| r.profile == used_profile)
        .collect();
    if by_profile.is_empty() {
        tracing::debug!(
            target: "hrdesk::engine",
            used_profile = used_profile,
            "no record for profile"
        );
        return ResolutionResult::unanswered(
            Outcome::NoProfileData,
            no_profile_data_message(used_profile),
            detected_domain,
            0.0,
            detected_profile,
            used_profile,
        );
    }

    // Domain narrows the candidates only when it leaves something to score.
    let candidates = match detected_domain.as_deref() {
        Some(domain) => {
            let by_domain: Vec<&KnowledgeRecord> =
                by_profile.iter().copied().filter(|r| r.domain == domain).collect();
            if by_domain.is_empty() {
                by_profile
            } else {
                by_domain
            }
        }
        None => by_profile,
    };

    let query_tokens = normalize(question);
    if query_tokens.is_empty() {
        return ResolutionResult::unanswered(
            Outcome::QuestionTooShort,
            TOO_SHORT_MESSAGE.to_string(),
            detected_domain,
            0.0,
            detected_profile,
            used_profile,
        );
    }

    let mut best_score = 0.0_f64;
    let mut best: Option<&KnowledgeRecord> = None;
    for record in candidates.iter().copied() {
        let score = similarity(&query_tokens, &normalize(&record.question));
        if score > best_score {
            best_score = score;
            best = Some(record);
        }
    }

    match best {
        Some(record) if meets_threshold(best_score) => {
            let confidence = (best_score / SCORE_DIVISOR).min(1.0);
            tracing::debug!(
                target: "hrdesk::engine",
                used_profile = used_profile,
                domain = %record.domain,
                score = best_score,
                confidence,
                "answered"
            );
            ResolutionResult {
                answer: Some(record.answer.clone()),
                message: None,
                domain: Some(record.domain.clone()),
                matched_question: Some(record.question.clone()),
                confidence,
                detected_profile,
                used_profile: used_profile.to_string(),
                escalate: false,
                outcome: Outcome::Answered,
            }
        }
        _ => {
            let domain = detected_domain.or_else(|| best.map(|r| r.domain.clone()));
            tracing::debug!(
                target: "hrdesk::engine",
                used_profile = used_profile,
                score = best_score,
                candidates = candidates.len(),
                "escalated"
            );
            ResolutionResult::unanswered(
                Outcome::Escalated,
                ESCALATION_MESSAGE.to_string(),
                domain,
                best_score / SCORE_DIVISOR,
                detected_profile,
                used_profile,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(profile: &str, domain: &str, question: &str, answer: &str) -> KnowledgeRecord {
        KnowledgeRecord::new(profile, domain, question, answer)
    }

    fn sample_base() -> Vec<KnowledgeRecord> {
        vec![
            rec("CDI", "Congés", "Combien de jours de congés payés", "25 jours"),
            rec("CDI", "Avantages", "Ai-je droit aux tickets restaurant", "Oui, 9 euros par jour"),
            rec("CDI", "Temps de travail", "Quels sont les horaires de travail", "35h par semaine"),
            rec("CDD", "Avantages", "Ai-je droit aux tickets restaurant", "Oui, dès le premier jour"),
            rec("CDD", "Congés", "Combien de jours de congés pour un stage", "2,5 jours par mois"),
        ]
    }

    fn assert_invariants(r: &ResolutionResult) {
        assert_eq!(r.answer.is_some(), r.message.is_none());
        if r.escalate {
            assert!(r.answer.is_none());
        }
        assert!(r.confidence >= 0.0 && r.confidence <= 1.0);
        assert!(!r.used_profile.is_empty());
    }

    #[test]
    fn single_record_answers_leave_question() {
        let base = vec![rec("CDI", "Congés", "Combien de jours de congés payés", "25 jours")];
        let r = resolve("Combien de jours de congés ?", "CDI", &base);
        assert_invariants(&r);
        assert!(!r.escalate);
        assert_eq!(r.outcome, Outcome::Answered);
        assert_eq!(r.answer.as_deref(), Some("25 jours"));
        assert_eq!(r.domain.as_deref(), Some("Congés"));
        assert_eq!(r.matched_question.as_deref(), Some("Combien de jours de congés payés"));
        assert!((r.confidence - 0.45).abs() < 1e-9);
        assert_eq!(r.detected_profile, None);
        assert_eq!(r.used_profile, "CDI");
    }

    #[test]
    fn detected_profile_overrides_fallback() {
        let r = resolve("En tant que stagiaire, ai-je droit aux tickets restaurant ?", "CDI", &sample_base());
        assert_invariants(&r);
        assert_eq!(r.detected_profile, Some(Profile::Cdd));
        assert_eq!(r.used_profile, "CDD");
        assert_eq!(r.answer.as_deref(), Some("Oui, dès le premier jour"));
    }

    #[test]
    fn unknown_profile_reports_missing_data() {
        let r = resolve("Combien de jours de congés ?", "Freelance", &sample_base());
        assert_invariants(&r);
        assert_eq!(r.outcome, Outcome::NoProfileData);
        assert!(!r.escalate);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.message.as_deref(), Some("Aucune information disponible pour le profil 'Freelance'."));
        assert_eq!(r.domain.as_deref(), Some("Congés"));
    }

    #[test]
    fn empty_base_reports_missing_data() {
        let r = resolve("Combien de jours de congés ?", "CDI", &[]);
        assert_eq!(r.outcome, Outcome::NoProfileData);
        assert_eq!(r.confidence, 0.0);
    }

    #[test]
    fn stopword_question_asks_for_details() {
        let r = resolve("Et je suis où ?", "CDI", &sample_base());
        assert_invariants(&r);
        assert_eq!(r.outcome, Outcome::QuestionTooShort);
        assert!(!r.escalate);
        assert!(r.answer.is_none());
        assert_eq!(r.message.as_deref(), Some("Veuillez poser une question plus détaillée."));
    }

    #[test]
    fn weak_overlap_escalates_with_best_effort_domain() {
        // Best overlap is one token ("jours", or "quels" on a later record): 1 + 2/5 = 1.4.
        let r = resolve("Quels jours fériés cette année", "CDI", &sample_base());
        assert_invariants(&r);
        assert_eq!(r.outcome, Outcome::Escalated);
        assert!(r.escalate);
        assert_eq!(r.message.as_deref(), Some(ESCALATION_MESSAGE));
        assert!(r.matched_question.is_none());
        // No domain keyword: falls back to the best record's domain.
        assert_eq!(r.domain.as_deref(), Some("Congés"));
        assert!(r.confidence < 0.2);
    }

    #[test]
    fn nothing_in_common_escalates_with_zero_confidence() {
        let r = resolve("Quel est le montant du salaire", "CDI", &sample_base());
        assert_invariants(&r);
        assert!(r.escalate);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.domain, None);
    }

    #[test]
    fn score_of_exactly_two_answers() {
        // common 1 ("salaire"), widest 2 → 1 + 1 = 2.
        let base = vec![rec("CDI", "Rémunération", "salaire net", "Versé le 28")];
        let r = resolve("salaire brut", "CDI", &base);
        assert_invariants(&r);
        assert!(!r.escalate);
        assert_eq!(r.answer.as_deref(), Some("Versé le 28"));
        assert!((r.confidence - 0.2).abs() < 1e-9);
    }

    #[test]
    fn score_just_below_two_escalates() {
        // common 1, widest 3 → 1.667.
        let base = vec![rec("CDI", "Rémunération", "salaire net", "Versé le 28")];
        let r = resolve("salaire brut mensuel", "CDI", &base);
        assert!(r.escalate);
        assert_eq!(r.domain.as_deref(), Some("Rémunération"));
    }

    #[test]
    fn domain_filter_falls_back_when_it_would_empty_the_set() {
        // Domain "Avantages" is detected ("prime") but the CDI/Rémunération record is the only one.
        let base = vec![rec("CDI", "Rémunération", "Quand est versée la prime annuelle", "En décembre")];
        let r = resolve("Quand est versée la prime annuelle ?", "CDI", &base);
        assert!(!r.escalate);
        assert_eq!(r.answer.as_deref(), Some("En décembre"));
        assert_eq!(r.domain.as_deref(), Some("Rémunération"));
    }

    #[test]
    fn domain_filter_beats_a_better_score_in_another_domain() {
        // Only "vacances" is a domain keyword, so Congés is detected.
        // Avantages: common 4, widest 5 → 5.6. Congés: common 3, widest 5 → 4.2.
        let base = vec![
            rec("CDI", "Avantages", "tickets restaurant repas cantine", "Oui"),
            rec("CDI", "Congés", "tickets restaurant pendant vacances", "Non"),
        ];
        let r = resolve("tickets restaurant repas cantine vacances", "CDI", &base);
        assert!(!r.escalate);
        assert_eq!(r.answer.as_deref(), Some("Non"));
        assert_eq!(r.domain.as_deref(), Some("Congés"));
        assert_eq!(r.matched_question.as_deref(), Some("tickets restaurant pendant vacances"));
        assert!((r.confidence - 0.42).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_the_first_record() {
        let base = vec![
            rec("CDI", "Congés", "jours congés payés", "premier"),
            rec("CDI", "Congés", "jours congés payés", "second"),
        ];
        let r = resolve("jours congés payés", "CDI", &base);
        assert_eq!(r.answer.as_deref(), Some("premier"));
    }

    #[test]
    fn confidence_is_capped_at_one() {
        let q = "télétravail mutuelle prévoyance retraite formation mobilité intéressement participation";
        let base = vec![rec("CDI", "Avantages", q, "Tout est couvert")];
        let r = resolve(q, "CDI", &base);
        // 8 common + 2 = 10 → exactly 1.0; one more token would exceed it.
        assert_eq!(r.confidence, 1.0);
        let longer = format!("{} épargne", q);
        let base = vec![rec("CDI", "Avantages", &longer, "Tout est couvert")];
        assert_eq!(resolve(&longer, "CDI", &base).confidence, 1.0);
    }
}
