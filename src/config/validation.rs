//! Configuration validation.
//!
//! Range checks for the values [`Config::from_env`](super::Config::from_env)
//! reads. Strategy parameter sets carry their own `validate()`; this module
//! calls them so a bad environment is rejected at startup.

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed per-request timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Maximum allowed retry count.
pub const MAX_RETRIES: u32 = 10;

fn invalid(var: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        var: var.into(),
        reason: reason.into(),
    }
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `ANTHROPIC_API_KEY`, when set, must not be empty
/// - `REQUEST_TIMEOUT_MS` must be between 1000 and 300000
/// - `REASONING_TIMEOUT_MS` must be 0 (disabled) or at least 1000
/// - `ORACLE_MAX_RETRIES` must be between 0 and 10
/// - strategy parameters must pass their own `validate()`
/// - validation thresholds must be consistent
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api_key.as_ref().is_some_and(super::SecretString::is_empty) {
        return Err(invalid("ANTHROPIC_API_KEY", "must not be empty"));
    }

    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&config.request_timeout_ms) {
        return Err(invalid(
            "REQUEST_TIMEOUT_MS",
            format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        ));
    }

    if config.reasoning_timeout_ms != 0 && config.reasoning_timeout_ms < MIN_TIMEOUT_MS {
        return Err(invalid(
            "REASONING_TIMEOUT_MS",
            format!("must be 0 (disabled) or at least {MIN_TIMEOUT_MS} ms"),
        ));
    }

    if config.oracle_max_retries > MAX_RETRIES {
        return Err(invalid(
            "ORACLE_MAX_RETRIES",
            format!("must be between 0 and {MAX_RETRIES}"),
        ));
    }

    config.chain.validate()?;
    config.tree.validate()?;

    let v = &config.validation;
    if !(0.0..=1.0).contains(&v.confidence_tolerance) {
        return Err(invalid(
            "VALIDATION_CONFIDENCE_TOLERANCE",
            "must be between 0 and 1",
        ));
    }
    if v.max_input_chars == 0 {
        return Err(invalid("VALIDATION_MAX_INPUT_CHARS", "must be at least 1"));
    }
    if v.min_input_chars > v.max_input_chars {
        return Err(invalid(
            "VALIDATION_MIN_INPUT_CHARS",
            "must not exceed VALIDATION_MAX_INPUT_CHARS",
        ));
    }
    if !(v.outlier_sigma.is_finite() && v.outlier_sigma > 0.0) {
        return Err(invalid("VALIDATION_OUTLIER_SIGMA", "must be a positive number"));
    }

    Ok(())
}
