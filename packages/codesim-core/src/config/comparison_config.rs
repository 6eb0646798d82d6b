//! Batch comparison configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use crate::shared::ports::Tokenizer;

/// Upper bound for tile lengths; longer minimums would never report anything
const MAX_TILE_LENGTH: usize = 1000;

/// Upper bound for explicitly requested worker threads
const MAX_THREADS: usize = 1024;

/// Settings for one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonConfig {
    /// Overrides the tokenizer's default minimum tile length (1..=1000)
    pub minimum_tile_length: Option<usize>,

    /// Normalize token streams when the tokenizer supports it
    pub normalize: bool,

    /// Subtract base-code matches from the similarity divisor
    pub subtract_base_code: bool,

    /// Drop comparisons whose average similarity is below this value (0.0..=1.0)
    pub similarity_threshold: f64,

    /// Keep at most this many comparisons in the report (0 = unlimited)
    pub maximum_comparisons: usize,

    /// Copy files of submissions the tokenizer rejects below this directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarantine_dir: Option<PathBuf>,

    pub parallel: ParallelConfig,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            minimum_tile_length: None,
            normalize: false,
            subtract_base_code: true,
            similarity_threshold: 0.0,
            maximum_comparisons: 0,
            quarantine_dir: None,
            parallel: ParallelConfig::default(),
        }
    }
}

impl ComparisonConfig {
    pub fn with_minimum_tile_length(mut self, length: usize) -> Self {
        self.minimum_tile_length = Some(length);
        self
    }

    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_subtract_base_code(mut self, subtract: bool) -> Self {
        self.subtract_base_code = subtract;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_maximum_comparisons(mut self, maximum: usize) -> Self {
        self.maximum_comparisons = maximum;
        self
    }

    pub fn with_quarantine_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.quarantine_dir = Some(dir.into());
        self
    }

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.parallel.num_threads = num_threads;
        self
    }

    /// Effective minimum tile length for a tokenizer
    pub fn minimum_tile_length_for(&self, tokenizer: &dyn Tokenizer) -> usize {
        self.minimum_tile_length
            .unwrap_or_else(|| tokenizer.minimum_tile_length())
            .max(1)
    }
}

impl Validatable for ComparisonConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(length) = self.minimum_tile_length {
            if length == 0 || length > MAX_TILE_LENGTH {
                return Err(ConfigError::range_with_hint(
                    "minimum_tile_length",
                    length,
                    1,
                    MAX_TILE_LENGTH,
                    "Omit the field to use the tokenizer default",
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Validation(format!(
                "similarity_threshold must be between 0.0 and 1.0, got {}",
                self.similarity_threshold
            )));
        }

        self.parallel.validate()
    }

    fn config_name(&self) -> &'static str {
        "ComparisonConfig"
    }
}

/// Worker pool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct ParallelConfig {
    /// Worker threads (0 = 75% of the available cores)
    pub num_threads: usize,
}

impl ParallelConfig {
    pub fn effective_threads(&self) -> usize {
        if self.num_threads > 0 {
            return self.num_threads;
        }
        std::cmp::max(1, (num_cpus::get() * 3) / 4)
    }
}

impl Validatable for ParallelConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.num_threads > MAX_THREADS {
            return Err(ConfigError::range_with_hint(
                "num_threads",
                self.num_threads,
                0,
                MAX_THREADS,
                "Use 0 to size the pool from the available cores",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ParallelConfig"
    }
}
