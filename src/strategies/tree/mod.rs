//! Tree-of-Thoughts strategy.
//!
//! Builds a tree of candidate reasoning paths, searches it with one of four
//! algorithms and returns the best root-to-leaf path as the result.
//!
//! # Budgets
//!
//! - `max_depth`: nodes at this depth are never expanded
//! - `branching_factor`: candidate calls per expanded node
//! - `max_nodes`: nodes created, root included; no call is issued once the
//!   tree is full
//!
//! # Example
//!
//! ```ignore
//! use reasoning_engine::strategies::{SearchAlgorithm, TreeConfig, TreeOfThoughtsStrategy};
//!
//! let config = TreeConfig::default()
//!     .with_search_algorithm(SearchAlgorithm::Beam)
//!     .with_beam_width(2);
//! let strategy = TreeOfThoughtsStrategy::new(oracle, classifier, registry, config);
//! let (result, tree) = strategy.explore("Plan a product launch").await?;
//! ```

mod arena;
mod scoring;
mod search;

pub use arena::{NodeId, ThoughtNode, ThoughtTree};
pub use scoring::EvaluationStrategy;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use self::scoring::optimal_leaf;
use self::search::Search;
use super::core::{check_input, fallback_answer, finalize};
use super::{Capability, ReasoningStrategy};
use crate::config::DEFAULT_ORACLE_MAX_RETRIES;
use crate::error::{ConfigError, EngineError};
use crate::model::{ReasoningResult, ResultStatus, StrategyKind};
use crate::traits::{Oracle, ProblemClassifier};
use crate::validation::{RuleRegistry, Severity, SubjectRef, ValidationResult};

/// Search algorithm used to grow the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    /// Level order, no pruning.
    Bfs,
    /// One branch to full depth before its siblings.
    Dfs,
    /// Level order, keeping the best `beam_width` nodes per level.
    #[default]
    Beam,
    /// Lowest `cost + heuristic` first.
    #[serde(rename = "astar")]
    AStar,
}

impl SearchAlgorithm {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
            Self::Beam => "beam",
            Self::AStar => "astar",
        }
    }
}

impl std::fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bfs" | "breadth_first" => Ok(Self::Bfs),
            "dfs" | "depth_first" => Ok(Self::Dfs),
            "beam" => Ok(Self::Beam),
            "astar" | "a_star" | "a*" => Ok(Self::AStar),
            _ => Err(format!("Unknown search algorithm: {s}")),
        }
    }
}

/// Tree-of-Thoughts parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Deepest level that may be created.
    pub max_depth: usize,
    /// Candidate calls per expanded node.
    pub branching_factor: usize,
    /// Nodes created, root included.
    pub max_nodes: usize,
    /// How the tree is searched.
    pub search_algorithm: SearchAlgorithm,
    /// Nodes kept per level by Beam search.
    pub beam_width: usize,
    /// How paths are scored.
    pub evaluation_strategy: EvaluationStrategy,
    /// Weight of accumulated path cost in the A* priority.
    pub astar_cost_weight: f64,
    /// Weight of `1 - completeness` in the A* priority.
    pub astar_heuristic_weight: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            branching_factor: 3,
            max_nodes: 40,
            search_algorithm: SearchAlgorithm::Beam,
            beam_width: 2,
            evaluation_strategy: EvaluationStrategy::Hybrid,
            astar_cost_weight: 1.0,
            astar_heuristic_weight: 1.0,
        }
    }
}

impl TreeConfig {
    /// Set `max_depth`.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set `branching_factor`.
    #[must_use]
    pub const fn with_branching_factor(mut self, branching_factor: usize) -> Self {
        self.branching_factor = branching_factor;
        self
    }

    /// Set `max_nodes`.
    #[must_use]
    pub const fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Set the search algorithm.
    #[must_use]
    pub const fn with_search_algorithm(mut self, algorithm: SearchAlgorithm) -> Self {
        self.search_algorithm = algorithm;
        self
    }

    /// Set the beam width.
    #[must_use]
    pub const fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    /// Set the evaluation strategy.
    #[must_use]
    pub const fn with_evaluation(mut self, evaluation: EvaluationStrategy) -> Self {
        self.evaluation_strategy = evaluation;
        self
    }

    /// Set the A* weights.
    #[must_use]
    pub const fn with_astar_weights(mut self, cost: f64, heuristic: f64) -> Self {
        self.astar_cost_weight = cost;
        self.astar_heuristic_weight = heuristic;
        self
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first out-of-range
    /// parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_depth", self.max_depth),
            ("branching_factor", self.branching_factor),
            ("max_nodes", self.max_nodes),
            ("beam_width", self.beam_width),
        ];
        for (var, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    var: var.into(),
                    reason: "must be at least 1".into(),
                });
            }
        }
        let weights = [
            ("astar_cost_weight", self.astar_cost_weight),
            ("astar_heuristic_weight", self.astar_heuristic_weight),
        ];
        for (var, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    var: var.into(),
                    reason: "must be a finite, non-negative number".into(),
                });
            }
        }
        Ok(())
    }
}

/// Tree-of-Thoughts strategy.
pub struct TreeOfThoughtsStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    oracle: Arc<O>,
    classifier: Arc<P>,
    registry: Arc<RuleRegistry>,
    config: TreeConfig,
    max_retries: u32,
}

impl<O, P> TreeOfThoughtsStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    /// Create a new Tree-of-Thoughts strategy.
    #[must_use]
    pub fn new(
        oracle: Arc<O>,
        classifier: Arc<P>,
        registry: Arc<RuleRegistry>,
        config: TreeConfig,
    ) -> Self {
        Self {
            oracle,
            classifier,
            registry,
            config,
            max_retries: DEFAULT_ORACLE_MAX_RETRIES,
        }
    }

    /// Set the number of retries per oracle call.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Active parameters.
    #[must_use]
    pub const fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Run the search and return the result together with the explored tree.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for out-of-range parameters and
    /// [`EngineError::InvalidInput`] for a rejected problem statement.
    pub async fn explore(
        &self,
        problem: &str,
    ) -> Result<(ReasoningResult, ThoughtTree), EngineError> {
        self.config.validate()?;
        let mut validation = check_input(&self.registry, problem)?;
        let classification = self.classifier.classify(problem);

        info!(
            problem_type = classification.problem_type.as_str(),
            algorithm = %self.config.search_algorithm,
            max_depth = self.config.max_depth,
            max_nodes = self.config.max_nodes,
            "Tree-of-Thoughts started"
        );

        let outcome = Search::new(
            &*self.oracle,
            &self.registry,
            &self.config,
            self.max_retries,
            problem,
            classification,
        )
        .run()
        .await;
        let tree = outcome.tree;
        let stats = outcome.stats;
        validation.merge(outcome.findings);

        let evaluation = self.config.evaluation_strategy;
        let leaf = optimal_leaf(&tree, evaluation);
        let steps = leaf.map(|id| tree.path_steps(id)).unwrap_or_default();
        for step in &steps {
            validation.merge(self.registry.validate_step(step));
        }
        let terminal = leaf.is_some_and(|id| tree.node(id).is_terminal);

        let status = match leaf {
            Some(_) if terminal => ResultStatus::Completed,
            _ if stats.budget_hit => ResultStatus::BudgetExhausted,
            Some(_) => ResultStatus::Completed,
            None => {
                warn!("No viable path found");
                validation.push(
                    ValidationResult::new(
                        "no_viable_path",
                        Severity::Critical,
                        format!(
                            "no candidate survived: {} discarded, {} oracle failures",
                            stats.children_discarded, stats.oracle_failures
                        ),
                    )
                    .with_subject(SubjectRef::Result),
                );
                ResultStatus::Failed
            }
        };
        if status == ResultStatus::BudgetExhausted {
            warn!(max_nodes = self.config.max_nodes, "Node budget exhausted");
            validation.push(
                ValidationResult::new(
                    "budget_exhausted",
                    Severity::Warning,
                    format!(
                        "max_nodes ({}) reached before a terminal path was found",
                        self.config.max_nodes
                    ),
                )
                .with_subject(SubjectRef::Result),
            );
        }

        let final_answer = leaf
            .and_then(|id| tree.node(id).final_answer.clone())
            .or_else(|| fallback_answer(&steps));
        let path_score = leaf.map(|id| evaluation.score(tree.node(id)));

        let mut result = ReasoningResult::new(problem, StrategyKind::TreeOfThoughts, steps, status)
            .with_validation(validation)
            .with_metadata("problem_type", json!(classification.problem_type.as_str()))
            .with_metadata("algorithm", json!(self.config.search_algorithm.as_str()))
            .with_metadata("evaluation_strategy", json!(evaluation.as_str()))
            .with_metadata("nodes_created", json!(tree.len()))
            .with_metadata("nodes_expanded", json!(stats.nodes_expanded))
            .with_metadata("children_discarded", json!(stats.children_discarded))
            .with_metadata("oracle_failures", json!(stats.oracle_failures))
            .with_metadata("max_depth_reached", json!(tree.max_depth()))
            .with_metadata("path_score", json!(path_score));
        if self.config.search_algorithm == SearchAlgorithm::Beam {
            result = result.with_metadata("frontier_sizes", json!(stats.frontier_sizes));
        }
        result.final_answer = final_answer;

        let result = finalize(&self.registry, result);
        info!(
            steps = result.steps.len(),
            nodes = tree.len(),
            confidence = result.confidence,
            status = %result.status,
            "Tree-of-Thoughts finished"
        );
        Ok((result, tree))
    }
}

#[async_trait]
impl<O, P> ReasoningStrategy for TreeOfThoughtsStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    fn kind(&self) -> StrategyKind {
        StrategyKind::TreeOfThoughts
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::MultiPathExploration, Capability::Backtracking]
    }

    async fn reason(&self, problem: &str) -> Result<ReasoningResult, EngineError> {
        self.explore(problem).await.map(|(result, _tree)| result)
    }
}

impl<O, P> std::fmt::Debug for TreeOfThoughtsStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeOfThoughtsStrategy")
            .field("oracle", &"<Oracle>")
            .field("classifier", &"<ProblemClassifier>")
            .field("config", &self.config)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use crate::model::StepStatus;
    use crate::traits::{
        Classification, MockOracle, MockProblemClassifier, PathScores, Proposal, ProposalContext,
        ProposalPurpose,
    };
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_case::test_case;

    fn strategy(
        oracle: MockOracle,
        config: TreeConfig,
    ) -> TreeOfThoughtsStrategy<MockOracle, MockProblemClassifier> {
        let mut classifier = MockProblemClassifier::new();
        classifier
            .expect_classify()
            .returning(|_| Classification::default());
        TreeOfThoughtsStrategy::new(
            Arc::new(oracle),
            Arc::new(classifier),
            Arc::new(RuleRegistry::with_defaults()),
            config,
        )
    }

    fn candidate(ctx: &ProposalContext) -> usize {
        match ctx.purpose {
            ProposalPurpose::Branch { candidate, .. } => candidate,
            _ => usize::MAX,
        }
    }

    /// Candidate 0 is confident, later candidates less so; never terminal.
    fn graded_oracle() -> MockOracle {
        let mut oracle = MockOracle::new();
        oracle.expect_propose().returning(|ctx| {
            let k = candidate(&ctx);
            #[allow(clippy::cast_precision_loss)]
            let confidence = 0.9 - 0.2 * k as f64;
            Ok(Proposal::step(
                format!("depth {} option {k}", ctx.history.len() + 1),
                confidence,
            )
            .with_completeness(0.3))
        });
        oracle
    }

    #[tokio::test]
    async fn test_bfs_node_budget() {
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::Bfs)
            .with_max_depth(2)
            .with_branching_factor(2);
        let (result, tree) = strategy(graded_oracle(), config)
            .explore("Plan a 2-step task")
            .await
            .unwrap();

        assert_eq!(tree.len(), 7);
        assert!(result.steps.len() <= 2);
        assert_eq!(result.status, ResultStatus::Completed);
        assert_eq!(result.metadata["nodes_created"], json!(7));
        assert_eq!(result.metadata["max_depth_reached"], json!(2));
        assert!(tree.iter().all(|n| n.depth <= 2));
    }

    #[tokio::test]
    async fn test_bfs_picks_best_deep_path() {
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::Bfs)
            .with_max_depth(2)
            .with_branching_factor(2)
            .with_evaluation(EvaluationStrategy::Confidence);
        let result = strategy(graded_oracle(), config)
            .reason("Plan a 2-step task")
            .await
            .unwrap();

        let descriptions: Vec<&str> = result.steps.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(descriptions, vec!["depth 1 option 0", "depth 2 option 0"]);
        assert!((result.confidence - 0.9).abs() < 1e-9);
        assert!(result.steps.iter().all(|s| s.status == StepStatus::Completed));
    }

    #[tokio::test]
    async fn test_max_nodes_one_is_budget_exhausted() {
        let mut oracle = MockOracle::new();
        oracle.expect_propose().never();
        let config = TreeConfig::default().with_max_nodes(1);
        let result = strategy(oracle, config)
            .reason("Design a caching layer")
            .await
            .unwrap();
        assert_eq!(result.status, ResultStatus::BudgetExhausted);
        assert!(result.steps.is_empty());
        assert_eq!(result.validation.by_rule("budget_exhausted").count(), 1);
    }

    #[tokio::test]
    async fn test_terminal_node_stops_search() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut oracle = MockOracle::new();
        oracle.expect_propose().returning(move |ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            let p = Proposal::step(format!("option {}", candidate(&ctx)), 0.8)
                .with_completeness(1.0);
            Ok(if candidate(&ctx) == 1 {
                p.terminal().with_final_answer(json!("found"))
            } else {
                p
            })
        });
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::Dfs)
            .with_branching_factor(3);
        let result = strategy(oracle, config)
            .reason("Find a route")
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.status, ResultStatus::Completed);
        assert_eq!(result.final_answer, Some(json!("found")));
        assert_eq!(result.steps.len(), 1);
    }

    #[tokio::test]
    async fn test_all_children_invalid_is_no_viable_path() {
        let mut oracle = MockOracle::new();
        oracle.expect_propose().returning(|_| {
            Ok(Proposal {
                step_text: Some("overconfident".to_string()),
                confidence: Some(1.5),
                ..Proposal::default()
            })
        });
        let config = TreeConfig::default().with_search_algorithm(SearchAlgorithm::Bfs);
        let result = strategy(oracle, config)
            .reason("Design a caching layer")
            .await
            .unwrap();

        assert_eq!(result.status, ResultStatus::Failed);
        assert!(result.steps.is_empty());
        assert!(result.validation.blocking);
        assert_eq!(result.validation.by_rule("no_viable_path").count(), 1);
        assert_eq!(result.metadata["children_discarded"], json!(3));
    }

    #[tokio::test]
    async fn test_discarded_children_are_not_replaced() {
        let mut oracle = MockOracle::new();
        oracle.expect_propose().returning(|ctx| {
            Ok(if candidate(&ctx) == 0 && ctx.history.is_empty() {
                Proposal::step("", 0.9)
            } else {
                Proposal::step("fine", 0.7).with_completeness(0.5)
            })
        });
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::Bfs)
            .with_max_depth(1)
            .with_branching_factor(3);
        let (result, tree) = strategy(oracle, config)
            .explore("Design a caching layer")
            .await
            .unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(result.metadata["children_discarded"], json!(1));
        assert_eq!(result.validation.by_rule("child_discarded").count(), 1);
        assert!(!result.validation.blocking);
    }

    #[tokio::test]
    async fn test_beam_frontier_sizes() {
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::Beam)
            .with_max_depth(3)
            .with_branching_factor(3)
            .with_beam_width(2);
        let (result, tree) = strategy(graded_oracle(), config)
            .explore("Compare deployment options")
            .await
            .unwrap();

        // 1 + 3 + 2*3 + 2*3
        assert_eq!(tree.len(), 16);
        assert_eq!(result.metadata["frontier_sizes"], json!([2, 2, 2]));
    }

    #[tokio::test]
    async fn test_beam_ties_keep_earliest_nodes() {
        let mut oracle = MockOracle::new();
        oracle
            .expect_propose()
            .returning(|_| Ok(Proposal::step("same idea", 0.7).with_completeness(0.5)));
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::Beam)
            .with_max_depth(3)
            .with_branching_factor(3)
            .with_beam_width(2);
        let (result, tree) = strategy(oracle, config)
            .explore("Compare deployment options")
            .await
            .unwrap();

        // Level 1 is nodes 1..=3, level 2 is 4..=9; only the two lowest
        // ids of each level survive pruning.
        let expanded: Vec<usize> = tree
            .iter()
            .filter(|n| !n.is_leaf())
            .map(|n| n.id.index())
            .collect();
        assert_eq!(expanded, vec![0, 1, 2, 4, 5]);
        assert_eq!(result.metadata["frontier_sizes"], json!([2, 2, 2]));
        assert_eq!(tree.len(), 16);
    }

    #[tokio::test]
    async fn test_astar_follows_cheapest_path() {
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::AStar)
            .with_max_depth(2)
            .with_branching_factor(2)
            .with_max_nodes(5);
        let (result, tree) = strategy(graded_oracle(), config)
            .explore("Find a route")
            .await
            .unwrap();

        // Root, its two children, then the two children of the confident one.
        // The budget runs out before the weaker sibling is expanded.
        assert_eq!(tree.len(), 5);
        let expanded = tree.node(NodeId::ROOT).children[0];
        let sibling = tree.node(NodeId::ROOT).children[1];
        assert_eq!(tree.node(expanded).children.len(), 2);
        assert!(tree.node(sibling).is_leaf());
        assert_eq!(result.status, ResultStatus::BudgetExhausted);
        assert_eq!(result.metadata["algorithm"], json!("astar"));
    }

    #[tokio::test]
    async fn test_missing_completeness_uses_evaluate() {
        let mut oracle = MockOracle::new();
        oracle
            .expect_propose()
            .returning(|_| Ok(Proposal::step("try it", 0.8)));
        oracle
            .expect_evaluate()
            .times(1)
            .returning(|_, path| {
                assert_eq!(path.len(), 1);
                Ok(PathScores::new(0.8, 0.75, 1.0))
            });
        let config = TreeConfig::default()
            .with_max_depth(1)
            .with_branching_factor(1);
        let (_, tree) = strategy(oracle, config).explore("Find a route").await.unwrap();
        let child = tree.node(NodeId::ROOT).children[0];
        assert!((tree.node(child).scores.completeness - 0.75).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_oracle_failures_drop_branches() {
        let mut oracle = MockOracle::new();
        oracle.expect_propose().returning(|ctx| {
            if candidate(&ctx) == 0 {
                Err(OracleError::Rejected {
                    message: "policy".to_string(),
                })
            } else {
                Ok(Proposal::step("ok", 0.7).with_completeness(0.5))
            }
        });
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::Bfs)
            .with_max_depth(1)
            .with_branching_factor(2);
        let result = strategy(oracle, config).reason("Find a route").await.unwrap();
        assert_eq!(result.metadata["oracle_failures"], json!(1));
        assert_eq!(result.steps.len(), 1);
    }

    #[tokio::test]
    async fn test_completion_signal_marks_parent_terminal() {
        let mut oracle = MockOracle::new();
        oracle.expect_propose().returning(|ctx| {
            Ok(if ctx.history.is_empty() {
                Proposal::step("only step", 0.9).with_completeness(0.9)
            } else {
                Proposal::done().with_final_answer(json!("done"))
            })
        });
        let config = TreeConfig::default()
            .with_search_algorithm(SearchAlgorithm::Dfs)
            .with_branching_factor(1);
        let result = strategy(oracle, config).reason("Find a route").await.unwrap();
        assert_eq!(result.status, ResultStatus::Completed);
        assert_eq!(result.steps.len(), 1);
        assert_eq!(result.final_answer, Some(json!("done")));
    }

    #[test_case(TreeConfig::default().with_max_depth(0), "max_depth" ; "zero depth")]
    #[test_case(TreeConfig::default().with_beam_width(0), "beam_width" ; "zero beam")]
    #[test_case(TreeConfig::default().with_astar_weights(-1.0, 1.0), "astar_cost_weight" ; "negative cost weight")]
    #[test_case(TreeConfig::default().with_astar_weights(1.0, f64::NAN), "astar_heuristic_weight" ; "nan heuristic weight")]
    fn test_tree_config_validate(config: TreeConfig, expected: &str) {
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var, .. } if var == expected));
    }

    #[test]
    fn test_search_algorithm_from_str() {
        assert_eq!("A*".parse::<SearchAlgorithm>().unwrap(), SearchAlgorithm::AStar);
        assert_eq!("BFS".parse::<SearchAlgorithm>().unwrap(), SearchAlgorithm::Bfs);
        assert!("random".parse::<SearchAlgorithm>().is_err());
        assert_eq!(
            serde_json::to_string(&SearchAlgorithm::AStar).unwrap(),
            "\"astar\""
        );
    }
}
