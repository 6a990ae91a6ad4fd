//! Reasoning strategies.
//!
//! This module provides the strategies the coordinator dispatches to:
//! - [`ChainOfThoughtStrategy`]: Linear generate, validate, refine loop
//! - [`TreeOfThoughtsStrategy`]: Branching search over candidate paths
//! - [`DirectStrategy`]: A single oracle call, no decomposition
//!
//! Every strategy implements [`ReasoningStrategy`] and advertises the
//! [`Capability`] set the coordinator matches classifications against.
//!
//! Strategies are cheap to construct: they hold `Arc` handles to the oracle,
//! the classifier and the rule registry plus a copy of their parameters.

mod chain;
mod core;
mod direct;
mod tree;

pub use chain::{ChainConfig, ChainOfThoughtStrategy};
pub use direct::DirectStrategy;
pub use tree::{
    EvaluationStrategy, NodeId, SearchAlgorithm, ThoughtNode, ThoughtTree, TreeConfig,
    TreeOfThoughtsStrategy,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{ReasoningResult, StrategyKind};
use crate::traits::DecompositionHint;

/// What a strategy is good at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Problems with one obvious sequence of steps.
    LinearDecomposition,
    /// Re-generation of weak steps.
    Refinement,
    /// Comparing several candidate approaches.
    MultiPathExploration,
    /// Abandoning a path in favour of a sibling.
    Backtracking,
    /// Answering in one call.
    SingleShot,
}

impl Capability {
    /// Capability required to handle a problem with the given hint.
    #[must_use]
    pub const fn for_hint(hint: DecompositionHint) -> Self {
        match hint {
            DecompositionHint::Linear | DecompositionHint::Unknown => Self::LinearDecomposition,
            DecompositionHint::MultiPath => Self::MultiPathExploration,
        }
    }
}

/// A way of turning a problem statement into a [`ReasoningResult`].
#[async_trait]
pub trait ReasoningStrategy: Send + Sync {
    /// Strategy identifier recorded in results.
    fn kind(&self) -> StrategyKind;

    /// Capabilities used for dispatch.
    fn capabilities(&self) -> &'static [Capability];

    /// Reason about `problem`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] when the problem statement is
    /// rejected by validation and [`EngineError::InvalidConfig`] when the
    /// strategy parameters are out of range. Oracle failures never surface
    /// here; they are recorded inside the result.
    async fn reason(&self, problem: &str) -> Result<ReasoningResult, EngineError>;
}
