//! Cancellation and deadlines abandon the call without a result.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use reasoning_engine::classifier::KeywordClassifier;
use reasoning_engine::config::Config;
use reasoning_engine::{EngineError, ReasoningCoordinator, ReasoningOptions};
use tokio_util::sync::CancellationToken;

use crate::common::ScriptedOracle;

fn coordinator(
    oracle: &Arc<ScriptedOracle>,
) -> ReasoningCoordinator<ScriptedOracle, KeywordClassifier> {
    ReasoningCoordinator::new(
        Arc::clone(oracle),
        Arc::new(KeywordClassifier::new()),
        Config::default(),
    )
}

#[tokio::test]
async fn test_cancel_during_oracle_call() {
    let oracle = Arc::new(ScriptedOracle::stalled());
    let coordinator = coordinator(&oracle);
    let token = CancellationToken::new();

    let (outcome, ()) = tokio::join!(
        coordinator.reason_with_cancel(
            "Plan a product launch",
            ReasoningOptions::new(),
            token.clone()
        ),
        async {
            oracle.started().await;
            token.cancel();
        }
    );

    assert!(matches!(outcome, Err(EngineError::Cancelled)));
}

#[tokio::test]
async fn test_deadline_abandons_stalled_call() {
    let oracle = Arc::new(ScriptedOracle::stalled());
    let options = ReasoningOptions::new().with_timeout(Duration::from_millis(20));

    let err = coordinator(&oracle)
        .reason("What is 15 + 27?", options)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::TimedOut { .. }));
    assert!(err.is_cancellation());
}
