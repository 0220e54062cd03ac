//! Property tests for normalization, classification, scoring and resolution.

use hrdesk_core::{
    detect_domain, detect_profile, normalize, resolve, similarity, Domain, KnowledgeRecord, Outcome,
    Profile,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("congés".to_string()),
        Just("prime".to_string()),
        Just("horaires".to_string()),
        Just("stagiaire".to_string()),
        Just("cadre".to_string()),
        Just("de".to_string()),
        Just("les".to_string()),
        Just("?".to_string()),
        "[a-zéèàç]{1,9}",
    ]
}

fn sentence() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..12).prop_map(|w| w.join(" "))
}

fn tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{3,6}", 0..8)
}

fn as_set(v: &[String]) -> HashSet<&str> {
    v.iter().map(String::as_str).collect()
}

proptest! {
    #[test]
    fn normalization_is_idempotent(text in ".{0,80}") {
        let once = normalize(&text);
        let twice = normalize(&once.join(" "));
        prop_assert_eq!(as_set(&once), as_set(&twice));
    }

    #[test]
    fn normalized_tokens_are_lowercase_and_long(text in sentence()) {
        for t in normalize(&text) {
            prop_assert!(t.chars().count() > 2);
            prop_assert_eq!(t.to_lowercase(), t.clone());
        }
    }

    #[test]
    fn classifiers_stay_in_vocabulary(text in ".{0,80}") {
        if let Some(p) = detect_profile(&text) {
            prop_assert!(Profile::all().contains(&p));
        }
        if let Some(d) = detect_domain(&text) {
            prop_assert!(Domain::all().contains(&d));
        }
    }

    #[test]
    fn similarity_is_symmetric(a in tokens(), b in tokens()) {
        prop_assert!((similarity(&a, &b) - similarity(&b, &a)).abs() < 1e-12);
    }

    #[test]
    fn self_similarity_dominates_subsets_and_disjoint(a in prop::collection::vec("[a-z]{3,6}", 1..8)) {
        let own = similarity(&a, &a);
        let shorter = &a[..a.len() - 1];
        prop_assert!(similarity(&a, shorter) <= own);
        let disjoint: Vec<String> = a.iter().map(|t| format!("{}x9", t)).collect();
        prop_assert!(similarity(&a, &disjoint) <= own);
    }

    #[test]
    fn resolution_invariants_hold(question in sentence(), fallback in prop_oneof![Just("CDI"), Just("CDD"), Just("Autre")]) {
        let kb = vec![
            KnowledgeRecord::new("CDI", "Congés", "Combien de jours de congés payés", "25 jours"),
            KnowledgeRecord::new("CDI", "Avantages", "Montant de la prime annuelle", "Un mois de salaire"),
            KnowledgeRecord::new("CDD", "Temps de travail", "Quels sont mes horaires", "Variables"),
        ];
        let r = resolve(&question, fallback, &kb);
        prop_assert_eq!(r.answer.is_some(), r.message.is_none());
        prop_assert_eq!(r.escalate, r.outcome == Outcome::Escalated);
        if r.escalate {
            prop_assert!(r.answer.is_none());
            prop_assert!(r.confidence < 0.2);
        }
        prop_assert!((0.0..=1.0).contains(&r.confidence));
        match r.detected_profile {
            Some(p) => prop_assert_eq!(r.used_profile.as_str(), p.label()),
            None => prop_assert_eq!(r.used_profile.as_str(), fallback),
        }
    }
}
