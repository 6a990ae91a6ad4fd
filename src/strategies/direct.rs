//! Pass-through strategy.
//!
//! One oracle call, no decomposition. The proposal becomes the single step
//! of the result and goes through the same validation as any other step.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use super::core::{check_input, fallback_answer, finalize, propose_with_retry};
use super::{Capability, ReasoningStrategy};
use crate::config::DEFAULT_ORACLE_MAX_RETRIES;
use crate::error::EngineError;
use crate::model::{ReasoningResult, ReasoningStep, ResultStatus, StrategyKind};
use crate::traits::{Oracle, ProblemClassifier, ProposalContext};
use crate::validation::{RuleRegistry, Severity, SubjectRef, ValidationResult};

/// Single-call strategy.
pub struct DirectStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    oracle: Arc<O>,
    classifier: Arc<P>,
    registry: Arc<RuleRegistry>,
    max_retries: u32,
}

impl<O, P> DirectStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    /// Create a new direct strategy.
    #[must_use]
    pub fn new(oracle: Arc<O>, classifier: Arc<P>, registry: Arc<RuleRegistry>) -> Self {
        Self {
            oracle,
            classifier,
            registry,
            max_retries: DEFAULT_ORACLE_MAX_RETRIES,
        }
    }

    /// Set the number of retries for the oracle call.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[async_trait]
impl<O, P> ReasoningStrategy for DirectStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    fn kind(&self) -> StrategyKind {
        StrategyKind::Direct
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::SingleShot]
    }

    async fn reason(&self, problem: &str) -> Result<ReasoningResult, EngineError> {
        let mut validation = check_input(&self.registry, problem)?;
        let classification = self.classifier.classify(problem);
        info!(problem_type = classification.problem_type.as_str(), "Direct reasoning started");

        let context = ProposalContext::next(problem, classification, vec![]);
        let (steps, answer) =
            match propose_with_retry(&*self.oracle, context, self.max_retries).await {
                Ok(proposal) if proposal.is_completion_signal() => (vec![], proposal.final_answer),
                Ok(proposal) => {
                    let step = proposal.to_step(0);
                    let findings = self.registry.validate_step(&step);
                    let blocking = findings.blocking;
                    validation.merge(findings);
                    if blocking {
                        (vec![step.failed()], None)
                    } else {
                        (vec![step.completed()], proposal.final_answer)
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Direct oracle call failed");
                    validation.push(
                        ValidationResult::new("oracle_failure", Severity::Error, e.to_string())
                            .with_subject(SubjectRef::Step { index: 0 }),
                    );
                    let step =
                        ReasoningStep::new(0, format!("Oracle failure: {e}"), "", 0.0).failed();
                    (vec![step], None)
                }
            };

        let status = if steps.iter().all(ReasoningStep::is_completed) {
            ResultStatus::Completed
        } else {
            ResultStatus::Failed
        };
        let final_answer = match status {
            ResultStatus::Completed => answer.or_else(|| fallback_answer(&steps)),
            ResultStatus::Failed | ResultStatus::BudgetExhausted => None,
        };

        let mut result = ReasoningResult::new(problem, StrategyKind::Direct, steps, status)
            .with_validation(validation)
            .with_metadata("problem_type", json!(classification.problem_type.as_str()));
        result.final_answer = final_answer;
        Ok(finalize(&self.registry, result))
    }
}

impl<O, P> std::fmt::Debug for DirectStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectStrategy")
            .field("oracle", &"<Oracle>")
            .field("classifier", &"<ProblemClassifier>")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
