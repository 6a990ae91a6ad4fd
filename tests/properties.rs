//! Property-based tests for strategy budgets and result invariants.
//!
//! Uses proptest with the scripted oracle to check that budgets hold and
//! derived values stay consistent across arbitrary parameters.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use proptest::prelude::*;
use reasoning_engine::classifier::KeywordClassifier;
use reasoning_engine::strategies::{
    ChainConfig, ChainOfThoughtStrategy, ReasoningStrategy, SearchAlgorithm, TreeConfig,
    TreeOfThoughtsStrategy,
};
use reasoning_engine::traits::Proposal;
use reasoning_engine::validation::RuleRegistry;
use reasoning_engine::ReasoningResult;

use common::ScriptedOracle;

fn chain_script(confidences: &[f64], terminal: bool) -> Vec<Proposal> {
    let mut script: Vec<Proposal> = confidences
        .iter()
        .enumerate()
        .map(|(i, &c)| Proposal::step(format!("Step {}", i + 1), c))
        .collect();
    if terminal {
        script.push(Proposal::done());
    }
    script
}

fn run_chain(oracle: Arc<ScriptedOracle>, config: ChainConfig) -> ReasoningResult {
    let strategy = ChainOfThoughtStrategy::new(
        oracle,
        Arc::new(KeywordClassifier::new()),
        Arc::new(RuleRegistry::with_defaults()),
        config,
    );
    tokio_test::block_on(strategy.reason("Explain how tides work")).unwrap()
}

fn mean_of_completed(result: &ReasoningResult) -> f64 {
    let completed: Vec<f64> = result.completed_steps().map(|s| s.confidence).collect();
    if completed.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let n = completed.len() as f64;
        completed.iter().sum::<f64>() / n
    }
}

fn algorithm() -> impl Strategy<Value = SearchAlgorithm> {
    prop_oneof![
        Just(SearchAlgorithm::Bfs),
        Just(SearchAlgorithm::Dfs),
        Just(SearchAlgorithm::Beam),
        Just(SearchAlgorithm::AStar),
    ]
}

// ============================================================================
// Chain-of-Thought Properties
// ============================================================================

proptest! {
    /// Step count and refinement calls never exceed their budgets.
    #[test]
    fn chain_respects_budgets(
        confidences in prop::collection::vec(0.0f64..=1.0, 0..10),
        terminal in any::<bool>(),
        max_steps in 1usize..6,
        max_iterations in 0usize..4,
        threshold in 0.0f64..=1.0,
        refined in 0.0f64..=1.0,
    ) {
        let oracle = Arc::new(
            ScriptedOracle::chain(chain_script(&confidences, terminal))
                .with_refinement(Proposal::step("Refined step", refined)),
        );
        let config = ChainConfig::default()
            .with_max_steps(max_steps)
            .with_max_iterations(max_iterations)
            .with_min_confidence(threshold);

        let result = run_chain(Arc::clone(&oracle), config);

        prop_assert!(result.steps.len() <= max_steps);
        prop_assert!(oracle.refinements() <= max_iterations);
    }

    /// Reported confidence is the mean of completed step confidences.
    #[test]
    fn chain_confidence_is_mean_of_completed(
        confidences in prop::collection::vec(0.0f64..=1.0, 1..8),
        refined in 0.0f64..=1.0,
    ) {
        let oracle = Arc::new(
            ScriptedOracle::chain(chain_script(&confidences, true))
                .with_refinement(Proposal::step("Refined step", refined)),
        );

        let result = run_chain(oracle, ChainConfig::default());

        prop_assert!((result.confidence - mean_of_completed(&result)).abs() < 1e-9);
    }

    /// Running the registry twice over the same result gives the same summary.
    #[test]
    fn validation_is_idempotent(
        confidences in prop::collection::vec(0.0f64..=1.0, 0..8),
        terminal in any::<bool>(),
    ) {
        let oracle = Arc::new(ScriptedOracle::chain(chain_script(&confidences, terminal)));
        let result = run_chain(oracle, ChainConfig::default());
        let registry = RuleRegistry::with_defaults();

        let first = registry.validate_result(&result);
        let second = registry.validate_result(&result);

        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Tree-of-Thoughts Properties
// ============================================================================

proptest! {
    /// No node is deeper than max_depth and the tree never exceeds max_nodes.
    #[test]
    fn tree_respects_budgets(
        algorithm in algorithm(),
        max_depth in 1usize..4,
        branching in 1usize..4,
        max_nodes in 1usize..30,
        beam_width in 1usize..4,
    ) {
        let config = TreeConfig::default()
            .with_search_algorithm(algorithm)
            .with_max_depth(max_depth)
            .with_branching_factor(branching)
            .with_max_nodes(max_nodes)
            .with_beam_width(beam_width);
        let strategy = TreeOfThoughtsStrategy::new(
            Arc::new(ScriptedOracle::branching()),
            Arc::new(KeywordClassifier::new()),
            Arc::new(RuleRegistry::with_defaults()),
            config,
        );

        let (result, tree) =
            tokio_test::block_on(strategy.explore("Plan a product launch")).unwrap();

        prop_assert!(tree.len() <= max_nodes);
        prop_assert!(tree.iter().all(|n| n.depth <= max_depth));
        prop_assert!(result.steps.len() <= max_depth);
        prop_assert!((result.confidence - mean_of_completed(&result)).abs() < 1e-9);
    }

    /// Beam search keeps exactly min(beam_width, candidates) nodes per level.
    #[test]
    fn beam_frontier_is_bounded_by_width(
        max_depth in 1usize..4,
        branching in 1usize..4,
        beam_width in 1usize..5,
        max_nodes in 1usize..40,
    ) {
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::Beam)
            .with_max_depth(max_depth)
            .with_branching_factor(branching)
            .with_beam_width(beam_width)
            .with_max_nodes(max_nodes);
        let strategy = TreeOfThoughtsStrategy::new(
            Arc::new(ScriptedOracle::branching()),
            Arc::new(KeywordClassifier::new()),
            Arc::new(RuleRegistry::with_defaults()),
            config,
        );

        let (result, tree) =
            tokio_test::block_on(strategy.explore("Plan a product launch")).unwrap();

        let sizes: Vec<usize> =
            serde_json::from_value(result.metadata["frontier_sizes"].clone()).unwrap();
        for (level, size) in sizes.iter().enumerate() {
            let candidates = tree.at_depth(level + 1).len();
            prop_assert_eq!(*size, beam_width.min(candidates));
        }
    }
}
