//! Identical calls produce byte-identical results.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use reasoning_engine::classifier::KeywordClassifier;
use reasoning_engine::config::Config;
use reasoning_engine::strategies::{ChainConfig, SearchAlgorithm, TreeConfig};
use reasoning_engine::traits::Proposal;
use reasoning_engine::{ReasoningCoordinator, ReasoningOptions, StrategyKind};
use test_case::test_case;

use crate::common::{steady_steps, ScriptedOracle};

async fn canonical(oracle: ScriptedOracle, problem: &str, options: ReasoningOptions) -> String {
    ReasoningCoordinator::new(
        Arc::new(oracle),
        Arc::new(KeywordClassifier::new()),
        Config::default(),
    )
    .reason(problem, options)
    .await
    .unwrap()
    .to_canonical_json()
    .unwrap()
}

#[test_case(SearchAlgorithm::Bfs ; "bfs")]
#[test_case(SearchAlgorithm::Dfs ; "dfs")]
#[test_case(SearchAlgorithm::Beam ; "beam")]
#[test_case(SearchAlgorithm::AStar ; "astar")]
#[tokio::test]
async fn test_tree_results_byte_identical(algorithm: SearchAlgorithm) {
    let options = ReasoningOptions::new().with_tree(
        TreeConfig::default()
            .with_search_algorithm(algorithm)
            .with_max_depth(3)
            .with_branching_factor(3)
            .with_max_nodes(20),
    );

    let first = canonical(ScriptedOracle::branching(), "Plan a product launch", options).await;
    let second = canonical(ScriptedOracle::branching(), "Plan a product launch", options).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_chain_results_byte_identical() {
    let script = || {
        let mut steps = steady_steps(3, 0.5);
        steps.push(Proposal::step("Answer", 0.9).terminal());
        ScriptedOracle::chain(steps).with_refinement(Proposal::step("Sharper step", 0.7))
    };
    let options = ReasoningOptions::new()
        .with_strategy(StrategyKind::ChainOfThought)
        .with_chain(ChainConfig::default().with_max_iterations(2));

    let first = canonical(script(), "Explain how tides work", options).await;
    let second = canonical(script(), "Explain how tides work", options).await;

    assert_eq!(first, second);
}
