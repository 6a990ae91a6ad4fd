//! Shared reasoning data model.
//!
//! Value types produced by every strategy:
//! - [`ReasoningStep`]: One unit of reasoning with its lifecycle [`StepStatus`]
//! - [`ReasoningResult`]: The ordered steps, final answer and derived confidence
//! - [`StrategyKind`]: Which strategy produced a result
//!
//! Results own their steps exclusively and are immutable once returned.
//!
//! # Example
//!
//! ```
//! use reasoning_engine::model::{overall_confidence, ReasoningStep, StepStatus};
//!
//! let steps = vec![
//!     ReasoningStep::new(0, "Add 15 and 27", "basic arithmetic", 0.9).completed(),
//!     ReasoningStep::new(1, "Abandoned idea", "", 0.1).with_status(StepStatus::Skipped),
//!     ReasoningStep::new(2, "Check the sum", "verification", 0.7).completed(),
//! ];
//! assert!((overall_confidence(&steps) - 0.8).abs() < 1e-9);
//! ```

#![allow(clippy::missing_const_for_fn)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationSummary;

/// Lifecycle of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Created, not yet worked on.
    #[default]
    Pending,
    /// Being generated or refined.
    InProgress,
    /// Accepted into the reasoning.
    Completed,
    /// Rejected by validation or the oracle failed to produce it.
    Failed,
    /// Deliberately left out.
    Skipped,
}

impl StepStatus {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// Position in the result, contiguous from 0.
    pub index: usize,
    /// Human-readable description.
    pub description: String,
    /// Why this step follows from the previous ones.
    pub rationale: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Lifecycle status.
    pub status: StepStatus,
}

impl ReasoningStep {
    /// Create a new pending step.
    #[must_use]
    pub fn new(
        index: usize,
        description: impl Into<String>,
        rationale: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            index,
            description: description.into(),
            rationale: rationale.into(),
            confidence,
            status: StepStatus::Pending,
        }
    }

    /// Set the status.
    #[must_use]
    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark the step completed.
    #[must_use]
    pub fn completed(self) -> Self {
        self.with_status(StepStatus::Completed)
    }

    /// Mark the step failed.
    ///
    /// Confidence is forced back into [0, 1] (NaN becomes 0) so a failed
    /// step never carries an invalid score out of the engine.
    #[must_use]
    pub fn failed(mut self) -> Self {
        self.confidence = sanitize_confidence(self.confidence);
        self.with_status(StepStatus::Failed)
    }

    /// Returns true if the step counts toward overall confidence.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }
}

/// Clamp a confidence value into [0, 1], mapping NaN to 0.
#[must_use]
pub fn sanitize_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Overall confidence of a sequence of steps.
///
/// Arithmetic mean over `completed` steps only; every other status is left
/// out of both the sum and the denominator. Returns 0 when nothing completed.
#[must_use]
pub fn overall_confidence(steps: &[ReasoningStep]) -> f64 {
    let (sum, count) = steps
        .iter()
        .filter(|s| s.is_completed())
        .fold((0.0, 0_u32), |(sum, count), s| (sum + s.confidence, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// Strategy that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Iterative Chain-of-Thought.
    ChainOfThought,
    /// Tree-of-Thoughts search.
    TreeOfThoughts,
    /// Single oracle call, no decomposition.
    Direct,
}

impl StrategyKind {
    /// Returns the strategy name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ChainOfThought => "chain_of_thought",
            Self::TreeOfThoughts => "tree_of_thoughts",
            Self::Direct => "direct",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chain_of_thought" | "cot" | "chain" => Ok(Self::ChainOfThought),
            "tree_of_thoughts" | "tot" | "tree" => Ok(Self::TreeOfThoughts),
            "direct" | "passthrough" | "pass_through" => Ok(Self::Direct),
            _ => Err(format!("Unknown strategy: {s}")),
        }
    }
}

/// Overall outcome of a reasoning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// The strategy finished with no failed step.
    Completed,
    /// A step failed or no viable path was found.
    Failed,
    /// A hard budget stopped the strategy before it reached a solution.
    BudgetExhausted,
}

impl ResultStatus {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::BudgetExhausted => "budget_exhausted",
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one `reason()` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningResult {
    /// Original problem statement.
    pub problem: String,
    /// Ordered steps; each may depend on the ones before it.
    pub steps: Vec<ReasoningStep>,
    /// Strategy-defined final answer.
    pub final_answer: Option<serde_json::Value>,
    /// Derived overall confidence, see [`overall_confidence`].
    pub confidence: f64,
    /// Overall outcome.
    pub status: ResultStatus,
    /// Every finding collected during the call.
    pub validation: ValidationSummary,
    /// Strategy that produced this result.
    pub strategy: StrategyKind,
    /// Strategy-specific details (algorithm, nodes explored, ...).
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ReasoningResult {
    /// Create a result from its steps; confidence is derived from them.
    #[must_use]
    pub fn new(
        problem: impl Into<String>,
        strategy: StrategyKind,
        steps: Vec<ReasoningStep>,
        status: ResultStatus,
    ) -> Self {
        let confidence = overall_confidence(&steps);
        Self {
            problem: problem.into(),
            steps,
            final_answer: None,
            confidence,
            status,
            validation: ValidationSummary::default(),
            strategy,
            metadata: BTreeMap::new(),
        }
    }

    /// Set the final answer.
    #[must_use]
    pub fn with_final_answer(mut self, answer: serde_json::Value) -> Self {
        self.final_answer = Some(answer);
        self
    }

    /// Set the validation summary.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationSummary) -> Self {
        self.validation = validation;
        self
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Steps that count toward confidence.
    pub fn completed_steps(&self) -> impl Iterator<Item = &ReasoningStep> {
        self.steps.iter().filter(|s| s.is_completed())
    }

    /// Returns true if any step failed.
    #[must_use]
    pub fn has_failed_steps(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Failed)
    }

    /// Canonical structured form handed to formatting collaborators.
    ///
    /// Map keys are sorted, so equal results serialize byte-identically.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if a metadata value cannot be serialized.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
