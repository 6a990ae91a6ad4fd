//! Built-in validation rules.

use super::{RuleTarget, Severity, Subject, SubjectRef, ValidationResult, ValidationRule};
use crate::model::{overall_confidence, ResultStatus};

/// Tunable thresholds for the built-in rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationSettings {
    /// Inputs shorter than this (in characters) produce an `error`.
    pub min_input_chars: usize,
    /// Inputs longer than this (in characters) are `critical`.
    pub max_input_chars: usize,
    /// Allowed gap between reported and derived result confidence.
    pub confidence_tolerance: f64,
    /// Standard deviations beyond which a step confidence is an outlier.
    pub outlier_sigma: f64,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            min_input_chars: 3,
            max_input_chars: 10_000,
            confidence_tolerance: 0.05,
            outlier_sigma: 2.0,
        }
    }
}

/// Minimum number of completed steps before outlier detection applies.
const OUTLIER_MIN_STEPS: usize = 4;

/// Rejects blank problem statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonEmptyInputRule;

impl ValidationRule for NonEmptyInputRule {
    fn id(&self) -> &str {
        "non_empty_input"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Input
    }

    fn priority(&self) -> u32 {
        0
    }

    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        match subject {
            Subject::Input(text) if text.trim().is_empty() => vec![ValidationResult::new(
                self.id(),
                Severity::Critical,
                "problem statement is empty",
            )
            .with_subject(SubjectRef::Input)],
            _ => vec![],
        }
    }
}

/// Bounds the problem statement length.
#[derive(Debug, Clone, Copy)]
pub struct InputLengthRule {
    min_chars: usize,
    max_chars: usize,
}

impl InputLengthRule {
    /// Create a length rule with the given bounds.
    #[must_use]
    pub const fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }
}

impl ValidationRule for InputLengthRule {
    fn id(&self) -> &str {
        "input_length"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Input
    }

    fn priority(&self) -> u32 {
        10
    }

    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        let Subject::Input(text) = subject else {
            return vec![];
        };
        let trimmed = text.trim();
        // Blank input is reported by `non_empty_input`.
        if trimmed.is_empty() {
            return vec![];
        }
        let chars = trimmed.chars().count();
        if chars < self.min_chars {
            vec![ValidationResult::new(
                self.id(),
                Severity::Error,
                format!(
                    "problem statement has {chars} characters, expected at least {}",
                    self.min_chars
                ),
            )
            .with_subject(SubjectRef::Input)]
        } else if chars > self.max_chars {
            vec![ValidationResult::new(
                self.id(),
                Severity::Critical,
                format!(
                    "problem statement has {chars} characters, limit is {}",
                    self.max_chars
                ),
            )
            .with_subject(SubjectRef::Input)]
        } else {
            vec![]
        }
    }
}

/// Requires every step to carry a description.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepDescriptionRule;

impl ValidationRule for StepDescriptionRule {
    fn id(&self) -> &str {
        "step_description"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Step
    }

    fn priority(&self) -> u32 {
        0
    }

    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        match subject {
            Subject::Step(step) if step.description.trim().is_empty() => {
                vec![ValidationResult::new(
                    self.id(),
                    Severity::Critical,
                    "step has no description",
                )
                .with_subject(SubjectRef::Step { index: step.index })]
            }
            _ => vec![],
        }
    }
}

/// Requires step confidence in [0, 1].
#[derive(Debug, Clone, Copy, Default)]
pub struct StepConfidenceRule;

impl ValidationRule for StepConfidenceRule {
    fn id(&self) -> &str {
        "step_confidence"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Step
    }

    fn priority(&self) -> u32 {
        5
    }

    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        let Subject::Step(step) = subject else {
            return vec![];
        };
        if (0.0..=1.0).contains(&step.confidence) {
            return vec![];
        }
        let message = if step.confidence.is_nan() {
            "step confidence is missing".to_string()
        } else {
            format!("step confidence {} is outside [0, 1]", step.confidence)
        };
        vec![ValidationResult::new(self.id(), Severity::Critical, message)
            .with_subject(SubjectRef::Step { index: step.index })]
    }
}

/// A completed result must carry a final answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultCompletenessRule;

impl ValidationRule for ResultCompletenessRule {
    fn id(&self) -> &str {
        "result_completeness"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Result
    }

    fn priority(&self) -> u32 {
        10
    }

    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        let Subject::Result(result) = subject else {
            return vec![];
        };
        let missing = result
            .final_answer
            .as_ref()
            .is_none_or(serde_json::Value::is_null);
        if result.status == ResultStatus::Completed && missing {
            vec![ValidationResult::new(
                self.id(),
                Severity::Error,
                "result is marked completed but has no final answer",
            )
            .with_subject(SubjectRef::Result)]
        } else {
            vec![]
        }
    }
}

/// Reported result confidence must match the mean of completed steps.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceConsistencyRule {
    tolerance: f64,
}

impl ConfidenceConsistencyRule {
    /// Create a consistency rule with the given tolerance.
    #[must_use]
    pub const fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl ValidationRule for ConfidenceConsistencyRule {
    fn id(&self) -> &str {
        "confidence_consistency"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Result
    }

    fn priority(&self) -> u32 {
        20
    }

    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        let Subject::Result(result) = subject else {
            return vec![];
        };
        if !(0.0..=1.0).contains(&result.confidence) {
            return vec![ValidationResult::new(
                self.id(),
                Severity::Critical,
                format!("result confidence {} is outside [0, 1]", result.confidence),
            )
            .with_subject(SubjectRef::Result)];
        }
        let derived = overall_confidence(&result.steps);
        let gap = (result.confidence - derived).abs();
        if gap > self.tolerance {
            vec![ValidationResult::new(
                self.id(),
                Severity::Warning,
                format!(
                    "result confidence {:.3} differs from step mean {derived:.3} by {gap:.3}",
                    result.confidence
                ),
            )
            .with_subject(SubjectRef::Result)]
        } else {
            vec![]
        }
    }
}

/// Step indices must be contiguous from 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepSequenceRule;

impl ValidationRule for StepSequenceRule {
    fn id(&self) -> &str {
        "step_sequence"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::CrossStep
    }

    fn priority(&self) -> u32 {
        0
    }

    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        let Subject::Steps(steps) = subject else {
            return vec![];
        };
        steps
            .iter()
            .enumerate()
            .find(|(position, step)| step.index != *position)
            .map(|(position, step)| {
                vec![ValidationResult::new(
                    self.id(),
                    Severity::Critical,
                    format!("step at position {position} has index {}", step.index),
                )
                .with_subject(SubjectRef::Step { index: step.index })]
            })
            .unwrap_or_default()
    }
}

/// Flags completed steps whose confidence deviates sharply from the rest.
///
/// A step is an outlier when its confidence is farther than `sigma`
/// population standard deviations from the mean of the other completed
/// steps.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceOutlierRule {
    sigma: f64,
}

impl ConfidenceOutlierRule {
    /// Create an outlier rule with the given threshold.
    #[must_use]
    pub const fn new(sigma: f64) -> Self {
        Self { sigma }
    }
}

impl ValidationRule for ConfidenceOutlierRule {
    fn id(&self) -> &str {
        "confidence_outlier"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::CrossStep
    }

    fn priority(&self) -> u32 {
        30
    }

    #[allow(clippy::cast_precision_loss)]
    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        let Subject::Steps(steps) = subject else {
            return vec![];
        };
        let completed: Vec<(usize, f64)> = steps
            .iter()
            .filter(|s| s.is_completed() && s.confidence.is_finite())
            .map(|s| (s.index, s.confidence))
            .collect();
        if completed.len() < OUTLIER_MIN_STEPS {
            return vec![];
        }

        let mut findings = Vec::new();
        for (position, &(index, value)) in completed.iter().enumerate() {
            let others: Vec<f64> = completed
                .iter()
                .enumerate()
                .filter(|(p, _)| *p != position)
                .map(|(_, &(_, c))| c)
                .collect();
            let n = others.len() as f64;
            let mean = others.iter().sum::<f64>() / n;
            let variance = others.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
            let deviation = (value - mean).abs();
            if deviation > f64::EPSILON.sqrt() && deviation > self.sigma * variance.sqrt() {
                findings.push(
                    ValidationResult::new(
                        self.id(),
                        Severity::Warning,
                        format!(
                            "step {index} confidence {value:.3} deviates from the others (mean {mean:.3})"
                        ),
                    )
                    .with_subject(SubjectRef::Step { index }),
                );
            }
        }
        findings
    }
}
