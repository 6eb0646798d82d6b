//! Directory-backed quarantine

use std::io;
use std::path::{Path, PathBuf};

use crate::shared::ports::QuarantineDestination;

/// Quarantines into `<root>/<tokenizer-id>/<submission-name>`
#[derive(Debug, Clone)]
pub struct DirectoryQuarantine {
    root: PathBuf,
}

impl DirectoryQuarantine {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl QuarantineDestination for DirectoryQuarantine {
    fn destination(&self, tokenizer_id: &str, submission_name: &str) -> io::Result<PathBuf> {
        let directory = self.root.join(tokenizer_id).join(submission_name);
        std::fs::create_dir_all(&directory)?;
        Ok(directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ports::QuarantineOutcome;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    #[test]
    fn test_copies_files_flattened() {
        let source = TempDir::new().unwrap();
        let nested = source.path().join("src/main");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("Main.java"), "class Main {").unwrap();
        std::fs::write(source.path().join("Util.java"), "class Util {}").unwrap();

        let files: BTreeSet<PathBuf> = [nested.join("Main.java"), source.path().join("Util.java")]
            .into_iter()
            .collect();

        let target = TempDir::new().unwrap();
        let quarantine = DirectoryQuarantine::new(target.path());
        let outcome = quarantine.quarantine("java", "alice", &files);

        assert_eq!(outcome.copied, 2);
        assert_eq!(outcome.failed, 0);
        let directory = target.path().join("java").join("alice");
        assert!(directory.join("Main.java").exists());
        assert!(directory.join("Util.java").exists());
    }

    #[test]
    fn test_same_file_name_not_overwritten() {
        let source = TempDir::new().unwrap();
        for dir in ["a", "b"] {
            std::fs::create_dir_all(source.path().join(dir)).unwrap();
            std::fs::write(source.path().join(dir).join("Main.java"), dir).unwrap();
        }
        let files: BTreeSet<PathBuf> = ["a", "b"]
            .iter()
            .map(|dir| source.path().join(dir).join("Main.java"))
            .collect();

        let target = TempDir::new().unwrap();
        let outcome = DirectoryQuarantine::new(target.path()).quarantine("java", "carol", &files);

        assert_eq!(outcome, QuarantineOutcome { copied: 1, failed: 1 });
        let copied = target.path().join("java/carol/Main.java");
        assert_eq!(std::fs::read_to_string(copied).unwrap(), "a");
    }

    #[test]
    fn test_missing_file_counted_not_fatal() {
        let target = TempDir::new().unwrap();
        let files: BTreeSet<PathBuf> = [PathBuf::from("/nonexistent/Gone.java")].into_iter().collect();

        let outcome = DirectoryQuarantine::new(target.path()).quarantine("java", "bob", &files);
        assert_eq!(outcome.copied, 0);
        assert_eq!(outcome.failed, 1);
    }
}
