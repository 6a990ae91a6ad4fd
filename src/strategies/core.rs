//! Helpers shared by every strategy.
//!
//! - Input gate: reject blocking input before any oracle call
//! - Oracle calls with bounded retry on retryable errors
//! - Result finalization: run result and cross-step rules once

use tracing::{debug, warn};

use crate::error::{EngineError, OracleError};
use crate::model::{ReasoningResult, ReasoningStep};
use crate::traits::{Oracle, PathScores, Proposal, ProposalContext};
use crate::validation::{RuleRegistry, ValidationSummary};

/// Validate the problem statement.
///
/// Returns the (non-blocking) findings so they can be carried into the
/// result summary.
pub(crate) fn check_input(
    registry: &RuleRegistry,
    problem: &str,
) -> Result<ValidationSummary, EngineError> {
    let summary = registry.validate_input(problem);
    if summary.blocking {
        debug!(findings = summary.findings.len(), "Input rejected");
        return Err(EngineError::InvalidInput { summary });
    }
    Ok(summary)
}

/// Call [`Oracle::propose`], retrying up to `max_retries` times while the
/// error is retryable.
pub(crate) async fn propose_with_retry<O: Oracle>(
    oracle: &O,
    context: ProposalContext,
    max_retries: u32,
) -> Result<Proposal, OracleError> {
    let mut attempt = 0;
    loop {
        match oracle.propose(context.clone()).await {
            Ok(proposal) => return Ok(proposal),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                warn!(error = %e, attempt, max_retries, "Oracle propose failed, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Call [`Oracle::evaluate`] with the same retry policy as
/// [`propose_with_retry`].
pub(crate) async fn evaluate_with_retry<O: Oracle>(
    oracle: &O,
    problem: &str,
    path: &[ReasoningStep],
    max_retries: u32,
) -> Result<PathScores, OracleError> {
    let mut attempt = 0;
    loop {
        match oracle.evaluate(problem.to_string(), path.to_vec()).await {
            Ok(scores) => return Ok(scores),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                warn!(error = %e, attempt, max_retries, "Oracle evaluate failed, retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Run result-level and cross-step rules and fold their findings into the
/// result's summary.
pub(crate) fn finalize(registry: &RuleRegistry, mut result: ReasoningResult) -> ReasoningResult {
    let checks = registry.validate_result(&result);
    result.validation.merge(checks);
    result
}

/// The final answer to fall back on when the oracle gave none: the
/// description of the last completed step.
pub(crate) fn fallback_answer(steps: &[ReasoningStep]) -> Option<serde_json::Value> {
    steps
        .iter()
        .rev()
        .find(|s| s.is_completed())
        .map(|s| serde_json::Value::String(s.description.clone()))
}
