//! Iterative Chain-of-Thought strategy.
//!
//! Generates steps one at a time, passing the full history to the oracle,
//! validates each step as it arrives, then spends a shared refinement budget
//! on steps whose confidence falls below the acceptance bar.
//!
//! Termination is bounded by `max_steps` (generation calls) and
//! `max_iterations` (refinement calls across the whole run).

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use super::core::{check_input, fallback_answer, finalize, propose_with_retry};
use super::{Capability, ReasoningStrategy};
use crate::config::DEFAULT_ORACLE_MAX_RETRIES;
use crate::error::{ConfigError, EngineError};
use crate::model::{ReasoningResult, ReasoningStep, ResultStatus, StrategyKind};
use crate::traits::{Classification, Oracle, ProblemClassifier, ProposalContext, ProposalPurpose};
use crate::validation::{RuleRegistry, Severity, SubjectRef, ValidationResult, ValidationSummary};

/// Default cap on generated steps.
pub const DEFAULT_MAX_STEPS: usize = 8;

/// Default per-step acceptance bar.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// Default refinement budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Chain-of-Thought parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Hard cap on generated steps.
    pub max_steps: usize,
    /// Steps below this confidence are refinement candidates.
    pub min_confidence_threshold: f64,
    /// Total refinement calls allowed across the run.
    pub max_iterations: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            min_confidence_threshold: DEFAULT_MIN_CONFIDENCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ChainConfig {
    /// Set `max_steps`.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set `min_confidence_threshold`.
    #[must_use]
    pub const fn with_min_confidence(mut self, threshold: f64) -> Self {
        self.min_confidence_threshold = threshold;
        self
    }

    /// Set `max_iterations`.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if `max_steps` is zero or the
    /// threshold is outside [0, 1].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidValue {
                var: "max_steps".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence_threshold) {
            return Err(ConfigError::InvalidValue {
                var: "min_confidence_threshold".into(),
                reason: "must be between 0.0 and 1.0".into(),
            });
        }
        Ok(())
    }
}

/// Chain-of-Thought strategy.
///
/// # Example
///
/// ```ignore
/// use reasoning_engine::strategies::{ChainConfig, ChainOfThoughtStrategy, ReasoningStrategy};
///
/// let strategy = ChainOfThoughtStrategy::new(oracle, classifier, registry, ChainConfig::default());
/// let result = strategy.reason("What is 15 + 27?").await?;
/// println!("{} steps, confidence {}", result.steps.len(), result.confidence);
/// ```
pub struct ChainOfThoughtStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    oracle: Arc<O>,
    classifier: Arc<P>,
    registry: Arc<RuleRegistry>,
    config: ChainConfig,
    max_retries: u32,
}

impl<O, P> ChainOfThoughtStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    /// Create a new Chain-of-Thought strategy.
    #[must_use]
    pub fn new(
        oracle: Arc<O>,
        classifier: Arc<P>,
        registry: Arc<RuleRegistry>,
        config: ChainConfig,
    ) -> Self {
        Self {
            oracle,
            classifier,
            registry,
            config,
            max_retries: DEFAULT_ORACLE_MAX_RETRIES,
        }
    }

    /// Set the number of retries per generation call.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Active parameters.
    #[must_use]
    pub const fn config(&self) -> &ChainConfig {
        &self.config
    }

    async fn generate(
        &self,
        problem: &str,
        classification: Classification,
        validation: &mut ValidationSummary,
    ) -> Generation {
        let mut generation = Generation::default();

        while generation.steps.len() < self.config.max_steps {
            let index = generation.steps.len();
            let context = ProposalContext::next(problem, classification, generation.steps.clone());

            let proposal = match propose_with_retry(&*self.oracle, context, self.max_retries).await
            {
                Ok(p) => p,
                Err(e) => {
                    warn!(index, error = %e, "Step generation failed");
                    validation.push(
                        ValidationResult::new("oracle_failure", Severity::Error, e.to_string())
                            .with_subject(SubjectRef::Step { index }),
                    );
                    generation.steps.push(
                        ReasoningStep::new(index, format!("Oracle failure: {e}"), "", 0.0)
                            .failed(),
                    );
                    return generation;
                }
            };

            if proposal.is_completion_signal() {
                debug!(index, "Oracle signalled completion");
                generation.final_answer = proposal.final_answer;
                generation.finished = true;
                return generation;
            }

            let step = proposal.to_step(index);
            let findings = self.registry.validate_step(&step);
            let blocking = findings.blocking;
            validation.merge(findings);

            if blocking {
                warn!(index, "Step failed validation, stopping generation");
                generation.steps.push(step.failed());
                return generation;
            }

            debug!(index, confidence = step.confidence, "Step accepted");
            generation.steps.push(step.completed());

            if proposal.is_terminal {
                generation.final_answer = proposal.final_answer;
                generation.finished = true;
                return generation;
            }
        }

        generation
    }

    /// Replace weak steps, oldest first, while the iteration budget lasts.
    ///
    /// Each weak step is attempted at most once with a single oracle call.
    /// The replacement is kept when it passes validation and is at least as
    /// confident as the original.
    async fn refine(
        &self,
        problem: &str,
        classification: Classification,
        steps: &mut [ReasoningStep],
        validation: &mut ValidationSummary,
    ) -> Refinement {
        let mut refinement = Refinement::default();

        for index in 0..steps.len() {
            if refinement.iterations_used >= self.config.max_iterations {
                if steps[index..].iter().any(|s| self.is_weak(s)) {
                    debug!(index, "Refinement budget exhausted");
                }
                break;
            }
            if !self.is_weak(&steps[index]) {
                continue;
            }

            refinement.iterations_used += 1;
            let previous = steps[index].clone();
            let context = ProposalContext::next(problem, classification, steps[..index].to_vec())
                .with_purpose(ProposalPurpose::Refine {
                    index,
                    previous: previous.clone(),
                });

            let proposal = match self.oracle.propose(context).await {
                Ok(p) => p,
                Err(e) => {
                    warn!(index, error = %e, "Refinement call failed, keeping step");
                    continue;
                }
            };

            let candidate = proposal.to_step(index);
            let findings = self.registry.validate_step(&candidate);
            if findings.blocking {
                debug!(index, "Refinement rejected by validation");
                validation.push(
                    ValidationResult::new(
                        "refinement_rejected",
                        Severity::Info,
                        format!("replacement discarded: {}", findings.describe()),
                    )
                    .with_subject(SubjectRef::Step { index }),
                );
                continue;
            }

            if candidate.confidence >= previous.confidence {
                debug!(
                    index,
                    from = previous.confidence,
                    to = candidate.confidence,
                    "Step refined"
                );
                validation.merge(findings);
                steps[index] = candidate.completed();
                refinement.steps_replaced += 1;
            }
        }

        refinement
    }

    fn is_weak(&self, step: &ReasoningStep) -> bool {
        step.is_completed() && step.confidence < self.config.min_confidence_threshold
    }
}

#[derive(Debug, Default)]
struct Generation {
    steps: Vec<ReasoningStep>,
    final_answer: Option<serde_json::Value>,
    finished: bool,
}

#[derive(Debug, Default)]
struct Refinement {
    iterations_used: usize,
    steps_replaced: usize,
}

#[async_trait]
impl<O, P> ReasoningStrategy for ChainOfThoughtStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    fn kind(&self) -> StrategyKind {
        StrategyKind::ChainOfThought
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::LinearDecomposition, Capability::Refinement]
    }

    async fn reason(&self, problem: &str) -> Result<ReasoningResult, EngineError> {
        self.config.validate()?;
        let mut validation = check_input(&self.registry, problem)?;
        let classification = self.classifier.classify(problem);

        info!(
            problem_type = classification.problem_type.as_str(),
            max_steps = self.config.max_steps,
            "Chain-of-Thought started"
        );

        let Generation {
            mut steps,
            final_answer,
            finished,
        } = self.generate(problem, classification, &mut validation).await;

        let refinement = self
            .refine(problem, classification, &mut steps, &mut validation)
            .await;

        let status = if steps.iter().any(|s| !s.is_completed()) {
            ResultStatus::Failed
        } else if finished {
            ResultStatus::Completed
        } else {
            warn!(max_steps = self.config.max_steps, "Step budget exhausted");
            validation.push(
                ValidationResult::new(
                    "budget_exhausted",
                    Severity::Warning,
                    format!(
                        "max_steps ({}) reached before the oracle signalled completion",
                        self.config.max_steps
                    ),
                )
                .with_subject(SubjectRef::Result),
            );
            ResultStatus::BudgetExhausted
        };

        let final_answer = match status {
            ResultStatus::Failed => None,
            ResultStatus::Completed | ResultStatus::BudgetExhausted => {
                final_answer.or_else(|| fallback_answer(&steps))
            }
        };

        let steps_generated = steps.len();
        let mut result = ReasoningResult::new(problem, StrategyKind::ChainOfThought, steps, status)
            .with_validation(validation)
            .with_metadata("problem_type", json!(classification.problem_type.as_str()))
            .with_metadata("max_steps", json!(self.config.max_steps))
            .with_metadata("steps_generated", json!(steps_generated))
            .with_metadata("iterations_used", json!(refinement.iterations_used))
            .with_metadata("steps_refined", json!(refinement.steps_replaced));
        result.final_answer = final_answer;

        let result = finalize(&self.registry, result);
        info!(
            steps = result.steps.len(),
            confidence = result.confidence,
            status = %result.status,
            "Chain-of-Thought finished"
        );
        Ok(result)
    }
}

impl<O, P> std::fmt::Debug for ChainOfThoughtStrategy<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainOfThoughtStrategy")
            .field("oracle", &"<Oracle>")
            .field("classifier", &"<ProblemClassifier>")
            .field("config", &self.config)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}
