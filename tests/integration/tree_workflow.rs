//! Tree-of-Thoughts workflows.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use reasoning_engine::classifier::KeywordClassifier;
use reasoning_engine::config::Config;
use reasoning_engine::strategies::{SearchAlgorithm, TreeConfig, TreeOfThoughtsStrategy};
use reasoning_engine::validation::RuleRegistry;
use reasoning_engine::{ReasoningCoordinator, ReasoningOptions, ResultStatus, StrategyKind};
use serde_json::json;

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

fn strategy(
    oracle: ScriptedOracle,
    config: TreeConfig,
) -> TreeOfThoughtsStrategy<ScriptedOracle, KeywordClassifier> {
    TreeOfThoughtsStrategy::new(
        Arc::new(oracle),
        Arc::new(KeywordClassifier::new()),
        Arc::new(RuleRegistry::with_defaults()),
        config,
    )
}

#[tokio::test]
async fn test_planning_problem_bfs_budget() {
    let oracle = Arc::new(ScriptedOracle::branching());
    let tree = TreeConfig::default()
        .with_search_algorithm(SearchAlgorithm::Bfs)
        .with_max_depth(2)
        .with_branching_factor(2);

    let result = coordinator(&oracle)
        .reason("Plan a 2-step task", ReasoningOptions::new().with_tree(tree))
        .await
        .unwrap();

    assert_eq!(result.strategy, StrategyKind::TreeOfThoughts);
    assert_eq!(result.metadata["algorithm"], json!("bfs"));
    let nodes = result.metadata["nodes_created"].as_u64().unwrap();
    assert!(nodes <= 7, "created {nodes} nodes");
    assert!(result.steps.len() <= 2);
    assert_eq!(oracle.proposals(), 6);
}

#[tokio::test]
async fn test_single_node_budget_exhausted() {
    let oracle = Arc::new(ScriptedOracle::branching());
    let options = ReasoningOptions::new()
        .with_strategy(StrategyKind::TreeOfThoughts)
        .with_tree(TreeConfig::default().with_max_nodes(1));

    let result = coordinator(&oracle)
        .reason("Design a caching layer for a web service", options)
        .await
        .unwrap();

    assert_eq!(result.status, ResultStatus::BudgetExhausted);
    assert!(result.steps.is_empty());
    assert_eq!(result.validation.by_rule("budget_exhausted").count(), 1);
    assert_eq!(oracle.proposals(), 0);
}

#[tokio::test]
async fn test_terminal_level_stops_search() {
    let config = TreeConfig::default()
        .with_search_algorithm(SearchAlgorithm::Bfs)
        .with_max_depth(3)
        .with_branching_factor(2);
    let (result, tree) = strategy(ScriptedOracle::branching().with_terminal_depth(2), config)
        .explore("Plan a weekend trip")
        .await
        .unwrap();

    assert_eq!(result.status, ResultStatus::Completed);
    assert_eq!(tree.len(), 7);
    let descriptions: Vec<&str> = result.steps.iter().map(|s| s.description.as_str()).collect();
    assert_eq!(descriptions, vec!["depth 1 option 0", "depth 2 option 0"]);
    assert_eq!(result.final_answer, Some(json!("answer 0")));
}

#[tokio::test]
async fn test_beam_keeps_width_per_level() {
    let config = TreeConfig::default()
        .with_search_algorithm(SearchAlgorithm::Beam)
        .with_max_depth(3)
        .with_branching_factor(3)
        .with_beam_width(2);
    let (result, tree) = strategy(ScriptedOracle::branching(), config)
        .explore("Organize a conference")
        .await
        .unwrap();

    assert_eq!(result.metadata["frontier_sizes"], json!([2, 2, 2]));
    // root + 3 + 2*3 + 2*3
    assert_eq!(tree.len(), 16);
    assert_eq!(result.steps.len(), 3);
}

#[tokio::test]
async fn test_dfs_respects_depth() {
    let config = TreeConfig::default()
        .with_search_algorithm(SearchAlgorithm::Dfs)
        .with_max_depth(2)
        .with_branching_factor(2);
    let (result, tree) = strategy(ScriptedOracle::branching(), config)
        .explore("Plan a product launch")
        .await
        .unwrap();

    assert!(tree.iter().all(|n| n.depth <= 2));
    assert!(tree.len() <= 7);
    assert_eq!(result.metadata["algorithm"], json!("dfs"));
    assert_eq!(result.steps.len(), 2);
}
