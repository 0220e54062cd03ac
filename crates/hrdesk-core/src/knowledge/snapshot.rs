//! Process-wide knowledge-base snapshot that can be replaced wholesale.

use super::base::{KnowledgeBase, KnowledgeBaseError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Read-mostly holder for the current [`KnowledgeBase`].
///
/// Readers clone the inner `Arc` and resolve against that snapshot without holding the lock;
/// a reload parses the new file first and only then swaps the pointer.
pub struct SharedKnowledgeBase {
    source: PathBuf,
    current: RwLock<Arc<KnowledgeBase>>,
}

impl SharedKnowledgeBase {
    /// Loads `source` once. Fails if the file is absent or malformed.
    pub fn load<P: AsRef<Path>>(source: P) -> Result<Self, KnowledgeBaseError> {
        let source = source.as_ref().to_path_buf();
        let base = KnowledgeBase::load_csv(&source)?;
        Ok(Self::with_base(source, base))
    }

    /// Wraps an already-built base; `source` is used by later reloads.
    pub fn with_base<P: AsRef<Path>>(source: P, base: KnowledgeBase) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            current: RwLock::new(Arc::new(base)),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Current snapshot. Stays valid even if a reload happens afterwards.
    pub fn snapshot(&self) -> Arc<KnowledgeBase> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Replaces the snapshot with `base`.
    pub fn replace(&self, base: KnowledgeBase) {
        let base = Arc::new(base);
        match self.current.write() {
            Ok(mut guard) => *guard = base,
            Err(poisoned) => *poisoned.into_inner() = base,
        }
    }

    /// Re-reads the source file. On error the previous snapshot is kept.
    pub fn reload(&self) -> Result<Arc<KnowledgeBase>, KnowledgeBaseError> {
        match KnowledgeBase::load_csv(&self.source) {
            Ok(base) => {
                self.replace(base);
                tracing::info!(
                    target: "hrdesk::knowledge",
                    path = %self.source.display(),
                    "knowledge base reloaded"
                );
                Ok(self.snapshot())
            }
            Err(e) => {
                tracing::warn!(
                    target: "hrdesk::knowledge",
                    path = %self.source.display(),
                    error = %e,
                    "knowledge base reload failed; keeping previous snapshot"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeRecord;

    const HEADER: &str = "profil,domaine,question,reponse\n";

    #[test]
    fn reload_swaps_but_old_snapshot_survives() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RH_infos.csv");
        std::fs::write(&path, format!("{}CDI,Congés,Q1,A1\n", HEADER)).unwrap();

        let shared = SharedKnowledgeBase::load(&path).unwrap();
        let before = shared.snapshot();
        assert_eq!(before.len(), 1);

        std::fs::write(&path, format!("{}CDI,Congés,Q1,A1\nCDD,Congés,Q2,A2\n", HEADER)).unwrap();
        let after = shared.reload().unwrap();

        assert_eq!(after.len(), 2);
        assert_eq!(shared.snapshot().len(), 2);
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("RH_infos.csv");
        std::fs::write(&path, format!("{}CDI,Congés,Q1,A1\n", HEADER)).unwrap();
        let shared = SharedKnowledgeBase::load(&path).unwrap();

        std::fs::write(&path, "profil,question\nCDI,Q1\n").unwrap();
        assert!(shared.reload().is_err());
        assert_eq!(shared.snapshot().len(), 1);
    }

    #[test]
    fn load_fails_without_file() {
        assert!(SharedKnowledgeBase::load("/nonexistent/RH_infos.csv").is_err());
    }

    #[test]
    fn replace_is_visible_to_new_readers() {
        let shared = SharedKnowledgeBase::with_base("unused.csv", KnowledgeBase::default());
        shared.replace(KnowledgeBase::new(vec![KnowledgeRecord::new("CDI", "Congés", "Q", "A")]));
        assert_eq!(shared.snapshot().records()[0].answer, "A");
    }
}
