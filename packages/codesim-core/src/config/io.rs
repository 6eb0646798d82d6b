//! Configuration I/O (YAML loading)
//!
//! Schema v1:
//!
//! ```yaml
//! version: 1
//! comparison:
//!   minimum_tile_length: 9
//!   normalize: true
//!   similarity_threshold: 0.25
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::comparison_config::ComparisonConfig;
use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;

/// Schema versions this build understands
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    #[serde(default)]
    pub comparison: ComparisonConfig,
}

impl ComparisonConfig {
    /// Load and validate a configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML content
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        file.comparison.validate()?;
        Ok(file.comparison)
    }

    /// Export as schema v1 YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            comparison: self.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}
