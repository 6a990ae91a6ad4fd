//! Chain-of-Thought workflows.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use reasoning_engine::classifier::KeywordClassifier;
use reasoning_engine::config::Config;
use reasoning_engine::strategies::ChainConfig;
use reasoning_engine::traits::Proposal;
use reasoning_engine::validation::{MathPlugin, RuleRegistry, Severity, ValidationSettings};
use reasoning_engine::{
    EngineError, ReasoningCoordinator, ReasoningOptions, ResultStatus, StepStatus, StrategyKind,
};
use serde_json::json;

use crate::common::{steady_steps, ScriptedOracle};

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
async fn test_arithmetic_problem_single_step() {
    let oracle = Arc::new(ScriptedOracle::chain(vec![Proposal::step(
        "Add 15 and 27",
        0.95,
    )
    .terminal()
    .with_final_answer(json!("42"))]));
    let options = ReasoningOptions::new().with_chain(ChainConfig::default().with_max_steps(3));

    let result = coordinator(&oracle)
        .reason("What is 15 + 27?", options)
        .await
        .unwrap();

    assert_eq!(result.strategy, StrategyKind::ChainOfThought);
    assert_eq!(result.status, ResultStatus::Completed);
    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.steps[0].description, "Add 15 and 27");
    assert!((result.confidence - 0.95).abs() < 1e-9);
    assert_eq!(result.final_answer, Some(json!("42")));
    assert_eq!(result.metadata["problem_type"], json!("mathematical"));
    assert_eq!(oracle.refinements(), 0);
}

#[tokio::test]
async fn test_weak_step_refined_once() {
    let oracle = Arc::new(
        ScriptedOracle::chain(vec![
            Proposal::step("Estimate the total", 0.3),
            Proposal::step("Conclude", 0.9)
                .terminal()
                .with_final_answer(json!("done")),
        ])
        .with_refinement(Proposal::step("Estimate the total carefully", 0.8)),
    );
    let options = ReasoningOptions::new()
        .with_strategy(StrategyKind::ChainOfThought)
        .with_chain(
            ChainConfig::default()
                .with_min_confidence(0.6)
                .with_max_iterations(3),
        );

    let result = coordinator(&oracle)
        .reason("Estimate the cost of a trip", options)
        .await
        .unwrap();

    assert_eq!(oracle.refinements(), 1);
    assert_eq!(result.metadata["iterations_used"], json!(1));
    assert_eq!(result.metadata["steps_refined"], json!(1));
    assert_eq!(result.steps[0].description, "Estimate the total carefully");
    assert!((result.confidence - 0.85).abs() < 1e-9);
    assert_eq!(result.final_answer, Some(json!("done")));
}

#[tokio::test]
async fn test_step_budget_exhausted() {
    let oracle = Arc::new(ScriptedOracle::chain(steady_steps(5, 0.9)));
    let options = ReasoningOptions::new()
        .with_strategy(StrategyKind::ChainOfThought)
        .with_chain(ChainConfig::default().with_max_steps(3));

    let result = coordinator(&oracle)
        .reason("Explain how tides work", options)
        .await
        .unwrap();

    assert_eq!(result.status, ResultStatus::BudgetExhausted);
    assert_eq!(result.steps.len(), 3);
    assert!(result.steps.iter().all(|s| s.status == StepStatus::Completed));
    assert_eq!(result.final_answer, Some(json!("Step 3")));
    let notes: Vec<_> = result.validation.by_rule("budget_exhausted").collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Warning);
}

#[tokio::test]
async fn test_math_plugin_flags_wrong_equality() {
    let oracle = Arc::new(ScriptedOracle::chain(vec![Proposal::step(
        "15 + 27 = 43",
        0.9,
    )
    .terminal()
    .with_final_answer(json!("43"))]));
    let registry = RuleRegistry::builder()
        .with_builtin_rules(&ValidationSettings::default())
        .with_plugin(&MathPlugin)
        .build();

    let result = coordinator(&oracle)
        .with_registry(Arc::new(registry))
        .reason("What is 15 + 27?", ReasoningOptions::new())
        .await
        .unwrap();

    let findings: Vec<_> = result.validation.by_rule("math_expression").collect();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Error);
    // Errors are reported, not blocking
    assert_eq!(result.status, ResultStatus::Completed);
    assert_eq!(result.steps[0].status, StepStatus::Completed);
}

#[tokio::test]
async fn test_blank_problem_rejected_before_oracle() {
    let oracle = Arc::new(ScriptedOracle::chain(steady_steps(1, 0.9)));

    let err = coordinator(&oracle)
        .reason("   ", ReasoningOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidInput { .. }));
    assert_eq!(oracle.proposals(), 0);
}

#[tokio::test]
async fn test_zero_max_steps_rejected() {
    let oracle = Arc::new(ScriptedOracle::chain(steady_steps(1, 0.9)));
    let options = ReasoningOptions::new().with_chain(ChainConfig::default().with_max_steps(0));

    let err = coordinator(&oracle)
        .reason("What is 15 + 27?", options)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InvalidConfig(_)));
    assert_eq!(oracle.proposals(), 0);
}
