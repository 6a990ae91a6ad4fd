//! Reasoning Engine binary entry point.
//!
//! Usage: `reasoning-engine <problem...>`
//!
//! The canonical JSON result goes to stdout; all logs go to stderr.
//!
//! Coverage is excluded because the main function needs a live
//! Anthropic API key.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::process::ExitCode;
use std::sync::Arc;

use reasoning_engine::anthropic::{AnthropicClient, AnthropicOracle, ClientConfig};
use reasoning_engine::classifier::KeywordClassifier;
use reasoning_engine::config::Config;
use reasoning_engine::coordinator::{ReasoningCoordinator, ReasoningOptions};
use reasoning_engine::error::ConfigError;
use reasoning_engine::validation::{MathPlugin, RuleRegistry};
use tracing_subscriber::EnvFilter;

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration before logging so LOG_LEVEL applies
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let problem = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if problem.trim().is_empty() {
        eprintln!("usage: reasoning-engine <problem...>");
        return ExitCode::from(2);
    }

    let Some(api_key) = config.api_key.clone() else {
        let e = ConfigError::MissingRequired {
            var: "ANTHROPIC_API_KEY".to_string(),
        };
        tracing::error!("Configuration error: {e}");
        return ExitCode::FAILURE;
    };

    let client = match AnthropicClient::new(api_key, ClientConfig::from_config(&config)) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Client error: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        model = %config.model,
        timeout_ms = config.request_timeout_ms,
        "reasoning-engine starting"
    );

    let oracle = AnthropicOracle::new(client, config.model.clone());
    let registry = RuleRegistry::builder()
        .with_builtin_rules(&config.validation)
        .with_plugin(&MathPlugin)
        .build();
    let coordinator =
        ReasoningCoordinator::new(Arc::new(oracle), Arc::new(KeywordClassifier::new()), config)
            .with_registry(Arc::new(registry));

    let result = match coordinator.reason(&problem, ReasoningOptions::new()).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Reasoning failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    match result.to_canonical_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Serialization error: {e}");
            ExitCode::FAILURE
        }
    }
}
