//! Batch comparison pipeline
//!
//! # Phases
//!
//! ```text
//! 1. validate      unique names (base code included)
//! 2. prepare       parse → normalize (optional) → ready           (parallel)
//! 3. base code     every ready submission vs. base code            (parallel)
//! 4. compare       every ready pair with at least one candidate    (parallel)
//! 5. report        threshold, sort, truncate, exclusions
//! ```
//!
//! Phase 3 completes before phase 4 starts, so base-code exclusion is in place for
//! every pairwise comparison. A failed submission only drops out of phases 3 and 4.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::report::{BaseCodeSummary, ComparisonReport, ExcludedSubmission, RunStats};
use crate::config::{ComparisonConfig, Validatable};
use crate::errors::{CodesimError, Result};
use crate::features::submission::{
    compare_by_name, DirectoryQuarantine, Submission, SubmissionError,
};
use crate::features::tiling::{ComparisonResult, GreedyStringTiler};
use crate::shared::ports::{QuarantineDestination, Tokenizer};

pub struct ComparisonPipeline {
    config: ComparisonConfig,
    tokenizer: Arc<dyn Tokenizer>,
    quarantine: Option<Arc<dyn QuarantineDestination>>,
}

impl ComparisonPipeline {
    /// Validate the configuration and build a pipeline
    ///
    /// `tokenizer` supplies the default minimum tile length. A configured
    /// `quarantine_dir` becomes a [`DirectoryQuarantine`].
    pub fn new(config: ComparisonConfig, tokenizer: Arc<dyn Tokenizer>) -> Result<Self> {
        config.validate()?;
        let quarantine = config
            .quarantine_dir
            .as_ref()
            .map(|dir| Arc::new(DirectoryQuarantine::new(dir)) as Arc<dyn QuarantineDestination>);

        Ok(Self {
            config,
            tokenizer,
            quarantine,
        })
    }

    /// Replace the quarantine destination
    pub fn with_quarantine(mut self, quarantine: Arc<dyn QuarantineDestination>) -> Self {
        self.quarantine = Some(quarantine);
        self
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    pub fn tiler(&self) -> GreedyStringTiler {
        GreedyStringTiler::from_config(&self.config, self.tokenizer.as_ref())
    }

    /// Run a whole batch
    pub fn run(
        &self,
        submissions: Vec<Submission>,
        base_code: Option<Submission>,
    ) -> Result<ComparisonReport> {
        ensure_unique_names(&submissions, base_code.as_ref())?;

        let threads = self.config.parallel.effective_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| CodesimError::thread_pool(e.to_string()))?;

        info!(
            submissions = submissions.len(),
            base_code = base_code.is_some(),
            threads,
            minimum_tile_length = self.tiler().minimum_tile_length(),
            "starting comparison run"
        );

        pool.install(|| self.run_in_pool(submissions, base_code))
    }

    fn run_in_pool(
        &self,
        mut submissions: Vec<Submission>,
        base_code: Option<Submission>,
    ) -> Result<ComparisonReport> {
        let started = Instant::now();
        let tiler = self.tiler();

        // Phase 2: prepare
        let normalized = submissions
            .par_iter_mut()
            .map(|submission| self.prepare(submission))
            .filter(|normalized| *normalized)
            .count();
        let ready_count = submissions.iter().filter(|s| s.is_ready()).count();
        info!(
            ready = ready_count,
            failed = submissions.len() - ready_count,
            normalized,
            "prepared submissions"
        );

        // Phase 3: base code
        let base_code = match base_code {
            Some(mut base) => {
                self.prepare(&mut base);
                if !base.is_ready() {
                    let error = base.failure().cloned().unwrap_or_else(|| {
                        SubmissionError::IllegalState {
                            name: base.name().to_string(),
                            operation: "compare with base code",
                            state: base.state().to_string(),
                        }
                    });
                    warn!(base_code = base.name(), error = %error, "base code is not usable");
                    return Err(CodesimError::InvalidBaseCode(error));
                }

                submissions
                    .par_iter_mut()
                    .filter(|s| s.is_ready())
                    .try_for_each(|submission| -> std::result::Result<(), SubmissionError> {
                        let comparison = tiler.compare_with_base_code(submission, &base)?;
                        submission.set_base_code_comparison(Arc::new(comparison));
                        Ok(())
                    })?;
                info!(base_code = base.name(), "compared submissions with base code");
                Some(base)
            }
            None => None,
        };

        // Phase 4: pairwise
        let mut ready: Vec<&Submission> = submissions.iter().filter(|s| s.is_ready()).collect();
        ready.sort_by(|a, b| compare_by_name(a, b));

        let pairs: Vec<(usize, usize)> = (0..ready.len())
            .flat_map(|i| (i + 1..ready.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| ready[i].is_new() || ready[j].is_new())
            .collect();

        let mut comparisons = pairs
            .par_iter()
            .map(|&(i, j)| tiler.compare(ready[i], ready[j], self.config.subtract_base_code))
            .collect::<std::result::Result<Vec<ComparisonResult>, SubmissionError>>()?;
        let computed = comparisons.len();
        debug!(pairs = computed, "compared submission pairs");

        // Phase 5: report
        comparisons.retain(|c| c.similarity() >= self.config.similarity_threshold);
        comparisons.sort_by(|a, b| {
            b.similarity()
                .total_cmp(&a.similarity())
                .then_with(|| a.left().name.cmp(&b.left().name))
                .then_with(|| a.right().name.cmp(&b.right().name))
        });
        if self.config.maximum_comparisons > 0 {
            comparisons.truncate(self.config.maximum_comparisons);
        }

        let excluded: Vec<ExcludedSubmission> = submissions
            .iter()
            .filter_map(ExcludedSubmission::from_submission)
            .collect();

        let base_code = base_code.map(|base| BaseCodeSummary {
            name: base.name().to_string(),
            matched_tokens: ready
                .iter()
                .map(|s| {
                    let matched = s
                        .base_code_comparison()
                        .map_or(0, |c| c.matched_token_count());
                    (s.name().to_string(), matched)
                })
                .collect::<BTreeMap<_, _>>(),
        });

        let stats = RunStats {
            submissions: submissions.len(),
            ready: ready_count,
            normalized,
            comparisons_computed: computed,
            comparisons_reported: comparisons.len(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            computed = stats.comparisons_computed,
            reported = stats.comparisons_reported,
            excluded = excluded.len(),
            elapsed_ms = stats.elapsed_ms,
            "comparison run finished"
        );

        Ok(ComparisonReport {
            comparisons,
            excluded,
            base_code,
            stats,
        })
    }

    /// Take a submission as far as it goes; returns whether it was normalized
    fn prepare(&self, submission: &mut Submission) -> bool {
        if submission.parse(self.quarantine.as_deref()).is_err() {
            return false;
        }

        let mut normalized = false;
        if self.config.normalize {
            if submission.tokenizer().supports_normalization() {
                match submission.normalize() {
                    Ok(report) => {
                        normalized = true;
                        debug!(
                            submission = submission.name(),
                            removed = report.removed_count(),
                            "normalized submission"
                        );
                    }
                    Err(e) => {
                        warn!(submission = submission.name(), error = %e, "normalization skipped");
                    }
                }
            } else {
                debug!(
                    submission = submission.name(),
                    tokenizer = submission.tokenizer().identifier(),
                    "tokenizer does not support normalization"
                );
            }
        }

        if let Err(e) = submission.mark_ready() {
            warn!(submission = submission.name(), error = %e, "submission not ready");
        }
        normalized
    }
}

fn ensure_unique_names(submissions: &[Submission], base_code: Option<&Submission>) -> Result<()> {
    let mut seen = HashSet::with_capacity(submissions.len() + 1);
    for submission in submissions.iter().chain(base_code) {
        if !seen.insert(submission.name()) {
            return Err(CodesimError::DuplicateSubmissionName(
                submission.name().to_string(),
            ));
        }
    }
    Ok(())
}
