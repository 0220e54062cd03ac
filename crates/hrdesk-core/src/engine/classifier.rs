//! Keyword classifiers for employment profile and HR domain.
//!
//! Both tables are ordered slices rather than maps: profile detection returns the first
//! category that matches, and domain detection breaks ties by definition order.
//! Matching is plain substring containment on the lowercased question, so a keyword can
//! fire inside a longer word ("non cadre" contains "cadre").

use serde::{Deserialize, Serialize};
use std::fmt;

/// Employment-status category used to select applicable HR rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    #[serde(rename = "CDI")]
    Cdi,
    #[serde(rename = "CDD")]
    Cdd,
    #[serde(rename = "Intérim")]
    Interim,
    #[serde(rename = "Cadre")]
    Cadre,
    #[serde(rename = "Non-Cadre")]
    NonCadre,
}

impl Profile {
    /// Label as it appears in the knowledge base `profil` column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cdi => "CDI",
            Self::Cdd => "CDD",
            Self::Interim => "Intérim",
            Self::Cadre => "Cadre",
            Self::NonCadre => "Non-Cadre",
        }
    }

    /// All profiles in detection priority order.
    pub fn all() -> [Self; 5] {
        [Self::Cdi, Self::Cdd, Self::Interim, Self::Cadre, Self::NonCadre]
    }

    /// Reverse of [`Profile::label`]. Exact match only.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// HR topic category used to narrow candidate answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "Congés")]
    Conges,
    #[serde(rename = "Avantages")]
    Avantages,
    #[serde(rename = "Temps de travail")]
    TempsDeTravail,
}

impl Domain {
    /// Label as it appears in the knowledge base `domaine` column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Conges => "Congés",
            Self::Avantages => "Avantages",
            Self::TempsDeTravail => "Temps de travail",
        }
    }

    /// All domains in tie-break order.
    pub fn all() -> [Self; 3] {
        [Self::Conges, Self::Avantages, Self::TempsDeTravail]
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().into_iter().find(|d| d.label() == label)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const PROFILE_KEYWORDS: &[(Profile, &[&str])] = &[
    (Profile::Cdi, &["cdi", "contrat indéterminé", "permanent", "titulaire"]),
    (
        Profile::Cdd,
        &[
            "cdd",
            "contrat déterminé",
            "temporaire",
            "stagiaire",
            "stage",
            "apprenti",
            "apprentissage",
            "alternance",
            "alternant",
        ],
    ),
    (Profile::Interim, &["intérim", "intérimaire", "interim", "mission"]),
    (Profile::Cadre, &["cadre", "manager", "responsable"]),
    (Profile::NonCadre, &["non cadre", "ouvrier", "employé", "technicien"]),
];

const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (Domain::Conges, &["congé", "congés", "vacances", "repos", "absence"]),
    (Domain::Avantages, &["avantage", "prime", "indemnité"]),
    (
        Domain::TempsDeTravail,
        &["horaire", "pointage", "badge", "heure", "temps de travail", "35h"],
    ),
];

/// Returns the first profile (in priority order) with any keyword contained in `question`.
pub fn detect_profile(question: &str) -> Option<Profile> {
    let lowered = question.to_lowercase();
    PROFILE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(profile, _)| *profile)
}

/// Returns the domain with the most keyword hits in `question`; ties go to the earlier domain.
pub fn detect_domain(question: &str) -> Option<Domain> {
    let lowered = question.to_lowercase();
    let mut best: Option<(Domain, usize)> = None;
    for (domain, keywords) in DOMAIN_KEYWORDS {
        let hits = keywords.iter().filter(|kw| lowered.contains(*kw)).count();
        if hits == 0 {
            continue;
        }
        match best {
            Some((_, top)) if hits <= top => {}
            _ => best = Some((*domain, hits)),
        }
    }
    best.map(|(domain, _)| domain)
}
