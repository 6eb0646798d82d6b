//! Configuration validation

use super::error::ConfigResult;

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// use codesim_core::config::Validatable;
///
/// fn build<C: Validatable>(config: C) -> Result<Stage, ConfigError> {
///     config.validate()?;
///     // ... build
/// }
/// ```
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}
