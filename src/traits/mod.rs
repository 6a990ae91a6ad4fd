//! Collaborator contracts.
//!
//! The engine consumes exactly two capabilities:
//! - [`Oracle`]: step generation and path evaluation (an LLM or any test double)
//! - [`ProblemClassifier`]: advisory problem typing
//!
//! It also re-exports the value types from the `types` submodule.
//!
//! # Mocking
//!
//! Both traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.

mod types;

pub use types::{
    Classification, DecompositionHint, PathScores, ProblemType, Proposal, ProposalContext,
    ProposalPurpose,
};

use async_trait::async_trait;

use crate::error::OracleError;
use crate::model::ReasoningStep;

/// Generation/evaluation oracle.
///
/// Implementations must be safe to retry: the engine may repeat a call with
/// the same context after a retryable error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Propose one step for the given context.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the call fails or the reply is unusable.
    async fn propose(&self, context: ProposalContext) -> Result<Proposal, OracleError>;

    /// Score a path of steps against the problem.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError`] if the call fails or the reply is unusable.
    async fn evaluate(
        &self,
        problem: String,
        path: Vec<ReasoningStep>,
    ) -> Result<PathScores, OracleError>;
}

/// Advisory problem classifier.
#[cfg_attr(test, mockall::automock)]
pub trait ProblemClassifier: Send + Sync {
    /// Classify a problem statement.
    fn classify(&self, problem: &str) -> Classification;
}
