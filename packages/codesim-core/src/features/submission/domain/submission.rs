//! Submission
//!
//! Owns one candidate's files and token stream and drives its lifecycle. The stream
//! is held in an `Arc`: once the submission is [`Ready`](SubmissionState::Ready) it is
//! shared read-only by every comparison, and [`Submission::copy`] hands out a copy
//! whose stream is only duplicated when the copy is first mutated.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use tracing::{debug, error, trace, warn, Level};

use super::error::SubmissionError;
use super::state::SubmissionState;
use crate::features::normalization::{NormalizationError, NormalizationReport, TokenStringNormalizer};
use crate::features::tiling::ComparisonResult;
use crate::shared::models::{SourceLine, Token};
use crate::shared::ports::{QuarantineDestination, TokenPrinter, Tokenizer};

/// Streams shorter than this cannot yield a meaningful structural comparison
pub const MINIMUM_TOKEN_COUNT: usize = 3;

static NO_TOKEN_COUNTS: Lazy<BTreeMap<PathBuf, usize>> = Lazy::new(BTreeMap::new);

#[derive(Clone)]
pub struct Submission {
    /// Unique within a run; sole identity of the submission
    name: String,
    root: PathBuf,

    /// Candidate (checked) as opposed to reference-only
    is_new: bool,

    files: Arc<BTreeSet<PathBuf>>,
    tokenizer: Arc<dyn Tokenizer>,
    state: SubmissionState,
    tokens: Option<Arc<Vec<Token>>>,
    base_code_comparison: Option<Arc<ComparisonResult>>,

    /// Reset whenever the stream is replaced
    file_token_counts: OnceCell<BTreeMap<PathBuf, usize>>,
}

impl Submission {
    pub fn new(
        name: impl Into<String>,
        root: impl Into<PathBuf>,
        is_new: bool,
        files: impl IntoIterator<Item = PathBuf>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            is_new,
            files: Arc::new(files.into_iter().collect()),
            tokenizer,
            state: SubmissionState::Created,
            tokens: None,
            base_code_comparison: None,
            file_token_counts: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn files(&self) -> &BTreeSet<PathBuf> {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SubmissionState::Ready
    }

    /// Sticky failure flag
    pub fn has_errors(&self) -> bool {
        self.state.is_failed()
    }

    pub fn failure(&self) -> Option<&SubmissionError> {
        match &self.state {
            SubmissionState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn tokens(&self) -> Option<&[Token]> {
        self.tokens.as_deref().map(Vec::as_slice)
    }

    pub fn token_count(&self) -> usize {
        self.tokens.as_ref().map_or(0, |t| t.len())
    }

    /// Mutable stream of this submission only; shared copies are left untouched
    pub fn tokens_mut(&mut self) -> Option<&mut Vec<Token>> {
        self.file_token_counts = OnceCell::new();
        self.tokens.as_mut().map(Arc::make_mut)
    }

    /// Stream of a ready submission
    pub fn comparable_tokens(&self, operation: &'static str) -> Result<&[Token], SubmissionError> {
        match (&self.state, self.tokens()) {
            (SubmissionState::Ready, Some(tokens)) => Ok(tokens),
            _ => Err(self.illegal_state(operation)),
        }
    }

    pub fn base_code_comparison(&self) -> Option<&Arc<ComparisonResult>> {
        self.base_code_comparison.as_ref()
    }

    pub fn set_base_code_comparison(&mut self, comparison: Arc<ComparisonResult>) {
        self.base_code_comparison = Some(comparison);
    }

    /// Tokenize the submission's files
    ///
    /// Failures are recorded as sticky state and returned; they never panic or abort
    /// the caller's batch. When a quarantine destination is given, files of a
    /// submission the tokenizer rejects are copied there.
    pub fn parse(
        &mut self,
        quarantine: Option<&dyn QuarantineDestination>,
    ) -> Result<(), SubmissionError> {
        if self.state != SubmissionState::Created {
            return Err(self.illegal_state("parse"));
        }

        if self.files.is_empty() {
            error!(submission = %self.name, reason = "empty", "nothing to parse");
            return Err(self.fail(SubmissionError::EmptySubmission {
                name: self.name.clone(),
            }));
        }

        let tokens = match self.tokenizer.parse(&self.files) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(
                    submission = %self.name,
                    tokenizer = self.tokenizer.identifier(),
                    reason = "tokenizer",
                    file = ?e.file,
                    error = %e,
                    "failed to parse submission"
                );
                if let Some(destination) = quarantine {
                    let outcome = destination.quarantine(
                        self.tokenizer.identifier(),
                        &self.name,
                        &self.files,
                    );
                    debug!(
                        submission = %self.name,
                        copied = outcome.copied,
                        failed = outcome.failed,
                        "quarantined submission files"
                    );
                }
                return Err(self.fail(SubmissionError::TokenizationFailure {
                    name: self.name.clone(),
                    message: e.message,
                }));
            }
        };

        if tracing::enabled!(Level::TRACE) {
            for token in &tokens {
                trace!(
                    submission = %self.name,
                    token_type = %token.token_type,
                    line = token.line,
                    semantics = ?token.semantics,
                    "token"
                );
            }
        }

        if tokens.len() < MINIMUM_TOKEN_COUNT {
            error!(
                submission = %self.name,
                reason = "degenerate",
                tokens = tokens.len(),
                "submission is too short"
            );
            return Err(self.fail(SubmissionError::DegenerateSubmission {
                name: self.name.clone(),
                tokens: tokens.len(),
                minimum: MINIMUM_TOKEN_COUNT,
            }));
        }

        debug!(
            submission = %self.name,
            files = self.files.len(),
            tokens = tokens.len(),
            "parsed submission"
        );
        self.replace_tokens(tokens);
        self.state = SubmissionState::Parsed;
        Ok(())
    }

    /// Normalize with the default (conservative) normalizer
    pub fn normalize(&mut self) -> Result<NormalizationReport, SubmissionError> {
        self.normalize_with(&TokenStringNormalizer::default())
    }

    /// Replace the stream with its normalized form
    ///
    /// Unsupported streams (tokens without semantics) and inconsistent normalizer
    /// output leave the parsed stream in place; neither fails the submission.
    pub fn normalize_with(
        &mut self,
        normalizer: &TokenStringNormalizer,
    ) -> Result<NormalizationReport, SubmissionError> {
        let original = match (&self.state, &self.tokens) {
            (SubmissionState::Parsed, Some(tokens)) => Arc::clone(tokens),
            _ => return Err(self.illegal_state("normalize")),
        };

        match normalizer.normalize(&original) {
            Ok(normalized) => {
                let report = NormalizationReport::from_streams(&original, &normalized);
                debug!(submission = %self.name, order = %join(&report.original_order), "original line order");
                debug!(submission = %self.name, order = %join(&report.normalized_order), "line order after normalization");
                debug!(
                    submission = %self.name,
                    count = report.removed_count(),
                    lines = %join(&report.removed),
                    "removed lines"
                );

                self.replace_tokens(normalized);
                self.state = SubmissionState::Normalized;
                Ok(report)
            }
            Err(NormalizationError::MissingSemantics { index }) => {
                debug!(submission = %self.name, index, "token stream carries no semantics");
                Err(SubmissionError::NormalizationUnsupported {
                    name: self.name.clone(),
                    reason: format!("token {} carries no semantics", index),
                })
            }
            Err(NormalizationError::Inconsistency(detail)) => {
                error!(submission = %self.name, %detail, "normalizer produced an inconsistent stream");
                Err(SubmissionError::NormalizationInconsistency {
                    name: self.name.clone(),
                    detail,
                })
            }
        }
    }

    /// Freeze the stream for comparison
    pub fn mark_ready(&mut self) -> Result<(), SubmissionError> {
        match self.state {
            SubmissionState::Parsed | SubmissionState::Normalized => {}
            _ => return Err(self.illegal_state("mark ready")),
        }

        // Computed now so concurrent readers never race on it
        self.token_count_per_file();
        self.state = SubmissionState::Ready;
        Ok(())
    }

    /// `tokens - files`, minus base-code matches when requested (never below 0)
    pub fn similarity_divisor(&self, subtract_base_code: bool) -> usize {
        let mut divisor = self.token_count().saturating_sub(self.files.len());
        if subtract_base_code {
            if let Some(base) = &self.base_code_comparison {
                divisor = divisor.saturating_sub(base.matched_token_count());
            }
        }
        divisor
    }

    /// Tokens per file, including files that contributed none
    ///
    /// Empty when the submission has no stream.
    pub fn token_count_per_file(&self) -> &BTreeMap<PathBuf, usize> {
        let Some(tokens) = &self.tokens else {
            return &NO_TOKEN_COUNTS;
        };

        self.file_token_counts.get_or_init(|| {
            let mut counts: BTreeMap<PathBuf, usize> =
                self.files.iter().map(|file| (file.clone(), 0)).collect();
            for token in tokens.iter() {
                match counts.get_mut(&*token.file) {
                    Some(count) => *count += 1,
                    None => {
                        counts.insert(token.file.to_path_buf(), 1);
                    }
                }
            }
            counts
        })
    }

    /// Same identity and base-code comparison, stream duplicated on first mutation
    pub fn copy(&self) -> Submission {
        self.clone()
    }

    pub fn token_annotated_source(&self, printer: &dyn TokenPrinter) -> String {
        printer.print(self.tokens().unwrap_or(&[]), &self.root)
    }

    fn replace_tokens(&mut self, tokens: Vec<Token>) {
        self.tokens = Some(Arc::new(tokens));
        self.file_token_counts = OnceCell::new();
    }

    fn fail(&mut self, error: SubmissionError) -> SubmissionError {
        self.tokens = None;
        self.file_token_counts = OnceCell::new();
        self.state = SubmissionState::Failed(error.clone());
        error
    }

    fn illegal_state(&self, operation: &'static str) -> SubmissionError {
        SubmissionError::IllegalState {
            name: self.name.clone(),
            operation,
            state: self.state.to_string(),
        }
    }
}

/// Orders submissions by name
pub fn compare_by_name(a: &Submission, b: &Submission) -> Ordering {
    a.name.cmp(&b.name)
}

fn join(lines: &[SourceLine]) -> String {
    lines
        .iter()
        .map(|line| line.line.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PartialEq for Submission {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Submission {}

impl Hash for Submission {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Submission")
            .field("name", &self.name)
            .field("is_new", &self.is_new)
            .field("state", &self.state)
            .field("files", &self.files.len())
            .field("tokens", &self.token_count())
            .field("tokenizer", &self.tokenizer.identifier())
            .finish()
    }
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tiling::{Match, Participant};
    use crate::shared::models::{CodeSemantics, TokenType};
    use crate::shared::ports::TokenizationError;
    use std::sync::Mutex;

    /// Returns a fixed result for any file set
    struct ScriptedTokenizer {
        result: Result<Vec<Token>, TokenizationError>,
    }

    impl Tokenizer for ScriptedTokenizer {
        fn identifier(&self) -> &str {
            "scripted"
        }

        fn minimum_tile_length(&self) -> usize {
            2
        }

        fn supports_normalization(&self) -> bool {
            true
        }

        fn parse(&self, _files: &BTreeSet<PathBuf>) -> Result<Vec<Token>, TokenizationError> {
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct RecordingQuarantine {
        calls: Mutex<Vec<String>>,
    }

    impl QuarantineDestination for RecordingQuarantine {
        fn destination(&self, tokenizer_id: &str, name: &str) -> std::io::Result<PathBuf> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}/{}", tokenizer_id, name));
            Err(std::io::Error::new(std::io::ErrorKind::Other, "read-only"))
        }
    }

    fn token(name: &str, file: &str, line: u32) -> Token {
        Token::new(TokenType::new(name), Arc::from(Path::new(file)), line, 1, 1)
    }

    fn submission(files: &[&str], result: Result<Vec<Token>, TokenizationError>) -> Submission {
        Submission::new(
            "alice",
            "/submissions/alice",
            true,
            files.iter().map(PathBuf::from),
            Arc::new(ScriptedTokenizer { result }),
        )
    }

    fn ready(files: &[&str], tokens: Vec<Token>) -> Submission {
        let mut s = submission(files, Ok(tokens));
        s.parse(None).unwrap();
        s.mark_ready().unwrap();
        s
    }

    fn five_tokens() -> Vec<Token> {
        vec![
            token("a", "A.java", 1),
            token("b", "A.java", 1),
            token("c", "A.java", 2),
            token("d", "A.java", 3),
            Token::file_end(Arc::from(Path::new("A.java"))),
        ]
    }

    #[test]
    fn test_empty_submission_fails() {
        let mut s = submission(&[], Ok(five_tokens()));
        let err = s.parse(None).unwrap_err();

        assert!(matches!(err, SubmissionError::EmptySubmission { .. }));
        assert!(s.has_errors());
        assert!(s.tokens().is_none());
    }

    #[test]
    fn test_tokenizer_failure_quarantines() {
        let quarantine = RecordingQuarantine::default();
        let mut s = submission(&["A.java"], Err(TokenizationError::new("unexpected '}'")));

        let err = s.parse(Some(&quarantine)).unwrap_err();
        assert_eq!(
            err,
            SubmissionError::TokenizationFailure {
                name: "alice".to_string(),
                message: "unexpected '}'".to_string(),
            }
        );
        assert_eq!(*quarantine.calls.lock().unwrap(), vec!["scripted/alice"]);
        assert_eq!(s.failure(), Some(&err));
    }

    #[test]
    fn test_short_stream_is_degenerate() {
        let mut s = submission(&["A.java"], Ok(five_tokens()[..2].to_vec()));
        let err = s.parse(None).unwrap_err();

        assert!(matches!(
            err,
            SubmissionError::DegenerateSubmission { tokens: 2, minimum: 3, .. }
        ));
        assert!(s.tokens().is_none());
        assert!(s.token_count_per_file().is_empty());
    }

    #[test]
    fn test_parse_twice_is_illegal() {
        let mut s = submission(&["A.java"], Ok(five_tokens()));
        s.parse(None).unwrap();
        assert!(matches!(
            s.parse(None),
            Err(SubmissionError::IllegalState { operation: "parse", .. })
        ));
        assert_eq!(s.state(), &SubmissionState::Parsed);
    }

    #[test]
    fn test_divisor_without_base_code() {
        let s = ready(&["A.java"], five_tokens());
        assert_eq!(s.similarity_divisor(false), 4);
        assert_eq!(s.similarity_divisor(true), 4);
    }

    #[test]
    fn test_divisor_subtracts_base_code() {
        let mut s = ready(&["A.java"], five_tokens());
        s.set_base_code_comparison(Arc::new(ComparisonResult::new(
            Participant::new("alice", 4, 5),
            Participant::new("base", 2, 3),
            vec![Match::new(0, 0, 2)],
        )));

        assert_eq!(s.similarity_divisor(false), 4);
        assert_eq!(s.similarity_divisor(true), 2);
    }

    #[test]
    fn test_token_count_per_file_includes_empty_files() {
        let s = ready(
            &["A.java", "B.java", "C.java"],
            vec![
                token("a", "A.java", 1),
                token("b", "A.java", 2),
                Token::file_end(Arc::from(Path::new("A.java"))),
                token("c", "B.java", 1),
                Token::file_end(Arc::from(Path::new("B.java"))),
            ],
        );

        let counts = s.token_count_per_file();
        assert_eq!(counts[Path::new("A.java")], 3);
        assert_eq!(counts[Path::new("B.java")], 2);
        assert_eq!(counts[Path::new("C.java")], 0);
        assert_eq!(counts.values().sum::<usize>(), s.token_count());
    }

    #[test]
    fn test_copy_is_independent_and_shares_base_code() {
        let mut original = ready(&["A.java"], five_tokens());
        original.set_base_code_comparison(Arc::new(ComparisonResult::new(
            Participant::new("alice", 4, 5),
            Participant::new("base", 2, 3),
            vec![],
        )));

        let mut copy = original.copy();
        copy.tokens_mut().unwrap().truncate(1);

        assert_eq!(original.token_count(), 5);
        assert_eq!(copy.token_count(), 1);
        assert!(Arc::ptr_eq(
            original.base_code_comparison().unwrap(),
            copy.base_code_comparison().unwrap()
        ));
        assert_eq!(copy.token_count_per_file()[Path::new("A.java")], 1);
    }

    #[test]
    fn test_normalize_without_semantics_is_unsupported() {
        let mut s = submission(&["A.java"], Ok(five_tokens()));
        s.parse(None).unwrap();

        let err = s.normalize().unwrap_err();
        assert!(matches!(err, SubmissionError::NormalizationUnsupported { .. }));
        assert_eq!(s.state(), &SubmissionState::Parsed);
        assert_eq!(s.token_count(), 5);
        assert!(s.mark_ready().is_ok());
    }

    #[test]
    fn test_normalize_reports_removed_lines() {
        let file: Arc<Path> = Arc::from(Path::new("A.java"));
        let annotated = |name: &str, line: u32, semantics: CodeSemantics| {
            Token::new(TokenType::new(name), Arc::clone(&file), line, 1, 1).with_semantics(semantics)
        };
        let tokens = vec![
            annotated("ASSIGN", 1, CodeSemantics::new().with_write("x")),
            annotated("ASSIGN", 2, CodeSemantics::new().with_write("dead")),
            annotated("APPLY", 3, CodeSemantics::critical().with_read("x")),
            Token::file_end(Arc::clone(&file)),
        ];
        let mut s = submission(&["A.java"], Ok(tokens));
        s.parse(None).unwrap();

        let report = s.normalize().unwrap();
        assert_eq!(report.removed.iter().map(|l| l.line).collect::<Vec<_>>(), vec![2]);
        assert_eq!(s.token_count(), 3);
        assert_eq!(s.state(), &SubmissionState::Normalized);
    }

    #[test]
    fn test_compare_requires_ready() {
        let mut s = submission(&["A.java"], Ok(five_tokens()));
        s.parse(None).unwrap();
        assert!(s.comparable_tokens("compare").is_err());
        s.mark_ready().unwrap();
        assert_eq!(s.comparable_tokens("compare").unwrap().len(), 5);
    }

    #[test]
    fn test_identity_by_name() {
        let a = submission(&["A.java"], Ok(five_tokens()));
        let b = submission(&["B.java"], Err(TokenizationError::new("x")));
        assert_eq!(a, b);
        assert_eq!(compare_by_name(&a, &b), Ordering::Equal);
        assert_eq!(a.to_string(), "alice");
    }
}
