//! Knowledge records and CSV loading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::path::Path;

/// Header columns every knowledge-base file must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["profil", "domaine", "question", "reponse"];

/// One immutable row of the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    pub profile: String,
    pub domain: String,
    pub question: String,
    pub answer: String,
}

impl KnowledgeRecord {
    pub fn new(
        profile: impl Into<String>,
        domain: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            profile: profile.into(),
            domain: domain.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Row as it appears in the CSV. Empty cells deserialize to `None` and become empty strings.
#[derive(Debug, Deserialize)]
struct CsvRow {
    profil: Option<String>,
    domaine: Option<String>,
    question: Option<String>,
    reponse: Option<String>,
}

impl From<CsvRow> for KnowledgeRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            profile: row.profil.unwrap_or_default(),
            domain: row.domaine.unwrap_or_default(),
            question: row.question.unwrap_or_default(),
            answer: row.reponse.unwrap_or_default(),
        }
    }
}

/// Why a knowledge base could not be loaded. The gateway treats any of these as "no base available".
#[derive(Debug)]
pub enum KnowledgeBaseError {
    /// The file could not be opened.
    Open { path: String, source: csv::Error },
    /// The header row is missing one of [`REQUIRED_COLUMNS`].
    MissingColumn(&'static str),
    /// A data row (1-based, header excluded) could not be parsed.
    Row { row: usize, source: csv::Error },
}

impl fmt::Display for KnowledgeBaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => write!(f, "cannot open knowledge base '{}': {}", path, source),
            Self::MissingColumn(col) => write!(f, "knowledge base is missing column '{}'", col),
            Self::Row { row, source } => write!(f, "knowledge base row {} is malformed: {}", row, source),
        }
    }
}

impl std::error::Error for KnowledgeBaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Row { source, .. } => Some(source),
            Self::MissingColumn(_) => None,
        }
    }
}

/// Counts shown to users browsing the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeStats {
    pub questions: usize,
    pub profiles: usize,
    pub domains: usize,
}

/// Ordered, read-only collection of [`KnowledgeRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    records: Vec<KnowledgeRecord>,
}

impl KnowledgeBase {
    pub fn new(records: Vec<KnowledgeRecord>) -> Self {
        Self { records }
    }

    /// Loads a comma-separated file with a header row naming [`REQUIRED_COLUMNS`].
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeBaseError> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path).map_err(|source| KnowledgeBaseError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let base = Self::from_csv_reader(reader)?;
        tracing::info!(
            target: "hrdesk::knowledge",
            path = %path.display(),
            records = base.len(),
            "knowledge base loaded ({} records)",
            base.len()
        );
        Ok(base)
    }

    /// Loads CSV content from any reader (same format as [`KnowledgeBase::load_csv`]).
    pub fn from_reader<R: io::Read>(rdr: R) -> Result<Self, KnowledgeBaseError> {
        Self::from_csv_reader(csv::Reader::from_reader(rdr))
    }

    fn from_csv_reader<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, KnowledgeBaseError> {
        let headers = reader
            .headers()
            .map_err(|source| KnowledgeBaseError::Row { row: 0, source })?
            .clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(KnowledgeBaseError::MissingColumn(column));
            }
        }

        let mut records = Vec::new();
        for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|source| KnowledgeBaseError::Row { row: idx + 1, source })?;
            records.push(KnowledgeRecord::from(row));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct profiles, sorted.
    pub fn profiles(&self) -> Vec<String> {
        Self::distinct(self.records.iter().map(|r| r.profile.as_str()))
    }

    /// Distinct domains, sorted.
    pub fn domains(&self) -> Vec<String> {
        Self::distinct(self.records.iter().map(|r| r.domain.as_str()))
    }

    /// True when at least one record belongs to `profile`.
    pub fn has_profile(&self, profile: &str) -> bool {
        self.records.iter().any(|r| r.profile == profile)
    }

    /// Profile offered when the user picks none: the first one in sorted order.
    pub fn default_profile(&self) -> Option<String> {
        self.profiles().into_iter().next()
    }

    pub fn stats(&self) -> KnowledgeStats {
        KnowledgeStats {
            questions: self.records.len(),
            profiles: self.profiles().len(),
            domains: self.domains().len(),
        }
    }

    fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        values
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
