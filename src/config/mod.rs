//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading (with `.env` support)
//! - Strategy and validation defaults
//! - Range checks via [`validate_config`]
//! - Secure API key storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use reasoning_engine::config::{Config, SecretString};
//!
//! // Use Config::from_env() in production
//! let config = Config {
//!     api_key: Some(SecretString::new("sk-ant-example-key")),
//!     ..Config::default()
//! };
//!
//! assert_eq!(config.tree.beam_width, 2);
//! let debug = format!("{:?}", config);
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("sk-ant-example-key"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{validate_config, MAX_RETRIES, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::strategies::{ChainConfig, EvaluationStrategy, SearchAlgorithm, TreeConfig};
use crate::validation::ValidationSettings;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default per-request HTTP timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default whole-call timeout in milliseconds.
pub const DEFAULT_REASONING_TIMEOUT_MS: u64 = 120_000;

/// Default retries per oracle call.
pub const DEFAULT_ORACLE_MAX_RETRIES: u32 = 2;

/// Default Anthropic model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Engine configuration.
///
/// Use [`Config::from_env`] to load it from environment variables. The
/// per-strategy parameter sets act as defaults; a single call may override
/// them through `ReasoningOptions`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Anthropic API key; `None` when no real oracle is configured.
    pub api_key: Option<SecretString>,
    /// Log level or `EnvFilter` directive.
    pub log_level: String,
    /// Per-HTTP-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Whole-call timeout in milliseconds; 0 disables it.
    pub reasoning_timeout_ms: u64,
    /// Retries per oracle call.
    pub oracle_max_retries: u32,
    /// Anthropic model to use.
    pub model: String,
    /// Chain-of-Thought defaults.
    pub chain: ChainConfig,
    /// Tree-of-Thoughts defaults.
    pub tree: TreeConfig,
    /// Built-in rule thresholds.
    pub validation: ValidationSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            reasoning_timeout_ms: DEFAULT_REASONING_TIMEOUT_MS,
            oracle_max_retries: DEFAULT_ORACLE_MAX_RETRIES,
            model: DEFAULT_MODEL.to_string(),
            chain: ChainConfig::default(),
            tree: TreeConfig::default(),
            validation: ValidationSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional and falls back to the matching default.
    /// `ANTHROPIC_API_KEY` only matters to callers that build the Anthropic
    /// oracle.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable does not parse or
    /// any value fails [`validate_config`].
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        let api_key = std::env::var("ANTHROPIC_API_KEY").ok().map(SecretString::new);
        let log_level = std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level);
        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or(defaults.model);

        let chain = ChainConfig {
            max_steps: parse_env_usize("COT_MAX_STEPS", defaults.chain.max_steps)?,
            min_confidence_threshold: parse_env_f64(
                "COT_MIN_CONFIDENCE",
                defaults.chain.min_confidence_threshold,
            )?,
            max_iterations: parse_env_usize("COT_MAX_ITERATIONS", defaults.chain.max_iterations)?,
        };

        let tree = TreeConfig {
            max_depth: parse_env_usize("TOT_MAX_DEPTH", defaults.tree.max_depth)?,
            branching_factor: parse_env_usize(
                "TOT_BRANCHING_FACTOR",
                defaults.tree.branching_factor,
            )?,
            max_nodes: parse_env_usize("TOT_MAX_NODES", defaults.tree.max_nodes)?,
            search_algorithm: parse_env_enum::<SearchAlgorithm>(
                "TOT_SEARCH_ALGORITHM",
                defaults.tree.search_algorithm,
            )?,
            beam_width: parse_env_usize("TOT_BEAM_WIDTH", defaults.tree.beam_width)?,
            evaluation_strategy: parse_env_enum::<EvaluationStrategy>(
                "TOT_EVALUATION",
                defaults.tree.evaluation_strategy,
            )?,
            astar_cost_weight: parse_env_f64(
                "TOT_ASTAR_COST_WEIGHT",
                defaults.tree.astar_cost_weight,
            )?,
            astar_heuristic_weight: parse_env_f64(
                "TOT_ASTAR_HEURISTIC_WEIGHT",
                defaults.tree.astar_heuristic_weight,
            )?,
        };

        let validation = ValidationSettings {
            min_input_chars: parse_env_usize(
                "VALIDATION_MIN_INPUT_CHARS",
                defaults.validation.min_input_chars,
            )?,
            max_input_chars: parse_env_usize(
                "VALIDATION_MAX_INPUT_CHARS",
                defaults.validation.max_input_chars,
            )?,
            confidence_tolerance: parse_env_f64(
                "VALIDATION_CONFIDENCE_TOLERANCE",
                defaults.validation.confidence_tolerance,
            )?,
            outlier_sigma: parse_env_f64(
                "VALIDATION_OUTLIER_SIGMA",
                defaults.validation.outlier_sigma,
            )?,
        };

        let config = Self {
            api_key,
            log_level,
            request_timeout_ms: parse_env_u64("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms)?,
            reasoning_timeout_ms: parse_env_u64(
                "REASONING_TIMEOUT_MS",
                defaults.reasoning_timeout_ms,
            )?,
            oracle_max_retries: parse_env_u32(
                "ORACLE_MAX_RETRIES",
                defaults.oracle_max_retries,
            )?,
            model,
            chain,
            tree,
            validation,
        };

        validate_config(&config)?;
        Ok(config)
    }

    /// Whole-call deadline, `None` when disabled.
    #[must_use]
    pub const fn reasoning_timeout(&self) -> Option<Duration> {
        if self.reasoning_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.reasoning_timeout_ms))
        }
    }
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    parse_env(name, default, "must be a non-negative integer")
}

/// Parse an environment variable as u32, using a default if not set.
fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    parse_env(name, default, "must be a non-negative integer")
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    parse_env(name, default, "must be a non-negative integer")
}

fn parse_env_f64(name: &str, default: f64) -> Result<f64, ConfigError> {
    parse_env(name, default, "must be a number")
}

/// Parse an enum-valued variable through its `FromStr` impl, keeping the
/// impl's own error text as the reason.
fn parse_env_enum<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = String>,
{
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim()
            .parse()
            .map_err(|reason| ConfigError::InvalidValue {
                var: name.into(),
                reason,
            })
    })
}

fn parse_env<T: FromStr>(name: &str, default: T, reason: &str) -> Result<T, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: reason.into(),
        })
    })
}
