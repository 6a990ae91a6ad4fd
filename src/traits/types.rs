//! Shared types for the traits module.
//!
//! This module defines the values exchanged with collaborators:
//! - [`Classification`]: Advisory problem type and decomposition hint
//! - [`ProposalContext`]: Everything the oracle sees when asked for a step
//! - [`Proposal`]: One candidate step as reported by the oracle
//! - [`PathScores`]: Per-criterion scores of a whole path

#![allow(clippy::missing_const_for_fn)]

use serde::{Deserialize, Serialize};

use crate::model::ReasoningStep;

/// Kind of problem, used only to pick generation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    /// Arithmetic and algebra.
    Mathematical,
    /// Deductive logic.
    Logical,
    /// Sequencing actions toward a goal.
    Planning,
    /// Open-ended construction.
    Design,
    /// Anything else.
    #[default]
    General,
}

impl ProblemType {
    /// Returns the type name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mathematical => "mathematical",
            Self::Logical => "logical",
            Self::Planning => "planning",
            Self::Design => "design",
            Self::General => "general",
        }
    }
}

/// How the problem is expected to decompose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecompositionHint {
    /// One obvious sequence of steps.
    Linear,
    /// Several plausible approaches worth comparing.
    MultiPath,
    /// No signal either way.
    #[default]
    Unknown,
}

/// Output of a [`ProblemClassifier`](super::ProblemClassifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Classification {
    /// Problem type.
    pub problem_type: ProblemType,
    /// Decomposition hint.
    pub hint: DecompositionHint,
}

impl Classification {
    /// Create a new classification.
    #[must_use]
    pub const fn new(problem_type: ProblemType, hint: DecompositionHint) -> Self {
        Self { problem_type, hint }
    }
}

/// Why the oracle is being asked for a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProposalPurpose {
    /// The next step after `history`.
    Next,
    /// A replacement for a weak step.
    Refine {
        /// Index of the step being replaced.
        index: usize,
        /// The step being replaced.
        previous: ReasoningStep,
    },
    /// One of several alternative continuations of a tree path.
    Branch {
        /// Zero-based candidate number.
        candidate: usize,
        /// Number of candidates requested for this node.
        of: usize,
    },
}

/// Context passed to [`Oracle::propose`](super::Oracle::propose).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalContext {
    /// Problem statement.
    pub problem: String,
    /// Advisory classification.
    pub classification: Classification,
    /// Steps so far (CoT history or the ToT node path, root excluded).
    pub history: Vec<ReasoningStep>,
    /// What kind of step is wanted.
    pub purpose: ProposalPurpose,
}

impl ProposalContext {
    /// Context asking for the step after `history`.
    #[must_use]
    pub fn next(
        problem: impl Into<String>,
        classification: Classification,
        history: Vec<ReasoningStep>,
    ) -> Self {
        Self {
            problem: problem.into(),
            classification,
            history,
            purpose: ProposalPurpose::Next,
        }
    }

    /// Replace the purpose.
    #[must_use]
    pub fn with_purpose(mut self, purpose: ProposalPurpose) -> Self {
        self.purpose = purpose;
        self
    }
}

/// One candidate step as reported by the oracle.
///
/// Every field is optional on the wire; missing values are judged by the
/// validation framework rather than rejected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Proposal {
    /// Step description.
    pub step_text: Option<String>,
    /// Rationale for the step.
    pub rationale: Option<String>,
    /// Confidence in [0, 1].
    pub confidence: Option<f64>,
    /// The path ending in this step solves the problem.
    #[serde(default)]
    pub is_terminal: bool,
    /// Fraction of sub-goals satisfied, in [0, 1].
    pub completeness: Option<f64>,
    /// Final answer, usually set together with `is_terminal`.
    pub final_answer: Option<serde_json::Value>,
}

impl Proposal {
    /// A non-terminal step.
    #[must_use]
    pub fn step(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            step_text: Some(text.into()),
            confidence: Some(confidence),
            ..Self::default()
        }
    }

    /// Completion signal carrying no further step.
    #[must_use]
    pub fn done() -> Self {
        Self {
            is_terminal: true,
            ..Self::default()
        }
    }

    /// Set the rationale.
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Mark the proposal as completing the solution.
    #[must_use]
    pub fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }

    /// Set the completeness score.
    #[must_use]
    pub fn with_completeness(mut self, completeness: f64) -> Self {
        self.completeness = Some(completeness);
        self
    }

    /// Set the final answer.
    #[must_use]
    pub fn with_final_answer(mut self, answer: serde_json::Value) -> Self {
        self.final_answer = Some(answer);
        self
    }

    /// Returns true when the oracle reports completion and has no step to add.
    #[must_use]
    pub fn is_completion_signal(&self) -> bool {
        self.is_terminal
            && self
                .step_text
                .as_deref()
                .map_or(true, |t| t.trim().is_empty())
    }

    /// Build a pending step at `index`.
    ///
    /// A missing confidence becomes NaN so that the confidence-range rule
    /// rejects it.
    #[must_use]
    pub fn to_step(&self, index: usize) -> ReasoningStep {
        ReasoningStep::new(
            index,
            self.step_text.clone().unwrap_or_default(),
            self.rationale.clone().unwrap_or_default(),
            self.confidence.unwrap_or(f64::NAN),
        )
    }
}

/// Per-criterion scores of a path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PathScores {
    /// Mean step confidence.
    pub confidence: f64,
    /// Fraction of sub-goals satisfied.
    pub completeness: f64,
    /// Preference for shorter paths.
    pub efficiency: f64,
}

impl PathScores {
    /// Create new path scores.
    #[must_use]
    pub const fn new(confidence: f64, completeness: f64, efficiency: f64) -> Self {
        Self {
            confidence,
            completeness,
            efficiency,
        }
    }
}
