//! Error types for the reasoning engine.
//!
//! This module defines a hierarchical error system:
//! - [`EngineError`]: Errors surfaced by [`reason`](crate::coordinator::ReasoningCoordinator::reason)
//! - [`OracleError`]: A single generation/evaluation call failed
//! - [`AnthropicError`]: Anthropic API specific errors
//! - [`ConfigError`]: Configuration errors
//!
//! Only input rejection, invalid configuration and cancellation reach the
//! caller as errors. Oracle failures are recovered locally and show up as
//! `failed` steps or branches inside a [`ReasoningResult`](crate::model::ReasoningResult).
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

use crate::validation::ValidationSummary;

/// Top-level engine error.
///
/// This is the error type returned by the coordinator and by every strategy.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// The problem statement failed validation before any oracle call.
    #[error("Invalid input: {}", summary.describe())]
    InvalidInput {
        /// Findings that made the input unusable.
        summary: ValidationSummary,
    },

    /// Strategy parameters are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The caller cancelled the call.
    #[error("Reasoning cancelled")]
    Cancelled,

    /// The call exceeded its deadline.
    #[error("Reasoning timed out after {elapsed_ms}ms")]
    TimedOut {
        /// Time spent before the deadline fired.
        elapsed_ms: u64,
    },
}

impl EngineError {
    /// Returns true for caller-initiated cancellation and timeouts.
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::TimedOut { .. })
    }
}

/// Oracle call errors.
///
/// These errors represent a single failed `propose` or `evaluate` call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The oracle could not be reached.
    #[error("Oracle unavailable: {message}")]
    Unavailable {
        /// Description of why the oracle is unavailable.
        message: String,
    },

    /// The oracle replied with data that could not be interpreted.
    #[error("Malformed oracle response: {message}")]
    Malformed {
        /// Description of what was malformed.
        message: String,
    },

    /// The call timed out.
    #[error("Oracle call timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The oracle refused the request; retrying will not help.
    #[error("Oracle rejected request: {message}")]
    Rejected {
        /// Reason given for the rejection.
        message: String,
    },
}

impl OracleError {
    /// Returns true if this error is retryable.
    ///
    /// Transport failures and malformed replies are retried. Rejections are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

/// Anthropic API errors.
///
/// These errors represent failures when communicating with the Anthropic API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnthropicError {
    /// Authentication failed due to invalid API key.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Request was rate limited.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_seconds: u64,
    },

    /// The requested model is overloaded.
    #[error("Model overloaded: {model}")]
    ModelOverloaded {
        /// The model that is overloaded.
        model: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the API.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

impl AnthropicError {
    /// Returns true if this error is retryable.
    ///
    /// Rate limiting and model overload errors are retryable.
    /// Authentication and invalid request errors are not.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::ModelOverloaded { .. }
                | Self::Timeout { .. }
                | Self::Network { .. }
        )
    }
}

impl From<AnthropicError> for OracleError {
    fn from(err: AnthropicError) -> Self {
        match err {
            AnthropicError::Timeout { timeout_ms } => Self::Timeout { timeout_ms },
            AnthropicError::AuthenticationFailed | AnthropicError::InvalidRequest { .. } => {
                Self::Rejected {
                    message: err.to_string(),
                }
            }
            AnthropicError::UnexpectedResponse { message } => Self::Malformed { message },
            AnthropicError::RateLimited { .. }
            | AnthropicError::ModelOverloaded { .. }
            | AnthropicError::Network { .. } => Self::Unavailable {
                message: err.to_string(),
            },
        }
    }
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
