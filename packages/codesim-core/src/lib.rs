/*
 * Codesim Core - Structural Similarity Engine for Submission Batches
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Token model and ports (tokenizer, quarantine, printer)
 * - features/    : Vertical slices (submission → normalization → tiling, tokenization)
 * - pipeline/    : Batch orchestration
 * - config/      : Validated, versioned YAML configuration
 *
 * Normalization only runs on streams whose tokens carry CodeSemantics. The bundled
 * tree-sitter tokenizers emit plain structural tokens and opt out of it.
 *
 * Performance:
 * - Rayon work-stealing over independent submission pairs
 * - Window-hash candidate index for Greedy String Tiling
 * - Frozen token streams shared through Arc, no per-comparison copies
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

pub mod config;
pub mod errors;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use config::{ComparisonConfig, ConfigError};
pub use errors::{CodesimError, Result};
pub use features::normalization::{NormalizationReport, TokenStringNormalizer};
pub use features::submission::{
    DirectoryQuarantine, FailureKind, LineAnnotatedPrinter, Submission, SubmissionError,
    SubmissionState,
};
pub use features::tiling::{ComparisonResult, GreedyStringTiler, Match, Participant};
pub use features::tokenization::{SourceLanguage, TreeSitterTokenizer};
pub use pipeline::{ComparisonPipeline, ComparisonReport, ExcludedSubmission};
pub use shared::models::{CodeSemantics, PositionSignificance, Token, TokenType};
pub use shared::ports::{
    QuarantineDestination, TokenPrinter, TokenizationError, Tokenizer,
};
