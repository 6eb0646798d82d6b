//! Configuration system
//!
//! One validated [`ComparisonConfig`] drives a batch run. It can be built in code or
//! loaded from a versioned YAML file:
//!
//! ```rust,ignore
//! use codesim_core::config::ComparisonConfig;
//!
//! // In code
//! let config = ComparisonConfig::default()
//!     .with_minimum_tile_length(9)
//!     .with_similarity_threshold(0.25);
//!
//! // From YAML (schema v1)
//! let config = ComparisonConfig::from_yaml("codesim.yaml")?;
//! ```

pub mod comparison_config;
pub mod error;
pub mod io;
pub mod validation;

// Re-exports
pub use comparison_config::{ComparisonConfig, ParallelConfig};
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, SUPPORTED_VERSIONS};
pub use validation::Validatable;
