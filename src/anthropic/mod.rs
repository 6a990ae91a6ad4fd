//! Anthropic-backed oracle.
//!
//! This module provides:
//! - [`AnthropicClient`]: Messages API client with retry and backoff
//! - [`AnthropicOracle`]: Maps prompts and JSON replies onto the
//!   [`Oracle`](crate::traits::Oracle) contract
//!
//! # Example
//!
//! ```no_run
//! use reasoning_engine::anthropic::{AnthropicClient, AnthropicOracle, ClientConfig};
//!
//! let client = AnthropicClient::new("sk-ant-xxx", ClientConfig::default())?;
//! let oracle = AnthropicOracle::new(client, "claude-sonnet-4-20250514");
//! # Ok::<(), reasoning_engine::error::AnthropicError>(())
//! ```

mod client;
mod config;
mod oracle;
mod types;

pub use client::{AnthropicClient, MAX_CONTENT_LENGTH, MAX_MESSAGES};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS,
};
pub use oracle::AnthropicOracle;
pub use types::{
    ApiErrorBody, ApiErrorDetails, ApiMessage, ApiRequest, ApiResponse, ApiUsage, Completion,
    ContentBlock,
};
