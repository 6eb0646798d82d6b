//! Test data builders

use std::path::PathBuf;
use std::sync::Arc;

use codesim_core::features::submission::Submission;
use codesim_core::shared::ports::Tokenizer;

/// Builder for submissions backed by a shared tokenizer
pub struct SubmissionBuilder {
    name: String,
    files: Vec<PathBuf>,
    is_new: bool,
    tokenizer: Arc<dyn Tokenizer>,
}

impl SubmissionBuilder {
    pub fn new(name: &str, tokenizer: &Arc<dyn Tokenizer>) -> Self {
        Self {
            name: name.to_string(),
            files: Vec::new(),
            is_new: true,
            tokenizer: Arc::clone(tokenizer),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Reference-only submission (compared only against candidates)
    pub fn reference(mut self) -> Self {
        self.is_new = false;
        self
    }

    pub fn build(self) -> Submission {
        Submission::new(
            self.name.clone(),
            PathBuf::from(&self.name),
            self.is_new,
            self.files,
            self.tokenizer,
        )
    }

    /// Parse and freeze without normalization
    pub fn build_ready(self) -> Submission {
        let mut submission = self.build();
        submission.parse(None).expect("fixture submission parses");
        submission.mark_ready().expect("fixture submission becomes ready");
        submission
    }
}
