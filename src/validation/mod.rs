//! Validation framework.
//!
//! A [`RuleRegistry`] holds an ordered list of [`ValidationRule`]s built once
//! at construction time. Each rule declares the [`RuleTarget`] it inspects
//! and a priority (lower runs first). Running the registry against a target
//! executes every applicable rule, never short-circuits, and folds the
//! findings into a [`ValidationSummary`].
//!
//! The registry is read-only after [`RuleRegistryBuilder::build`], so one
//! `Arc<RuleRegistry>` can be shared by any number of concurrent calls.
//!
//! # Example
//!
//! ```
//! use reasoning_engine::validation::{RuleRegistry, Severity};
//!
//! let registry = RuleRegistry::with_defaults();
//! let summary = registry.validate_input("   ");
//! assert!(summary.blocking);
//! assert_eq!(summary.count(Severity::Critical), 1);
//! ```

mod plugins;
mod rules;

pub use plugins::{MathExpressionRule, MathPlugin, NumericRangePlugin, NumericRangeRule};
pub use rules::{
    ConfidenceConsistencyRule, ConfidenceOutlierRule, InputLengthRule, NonEmptyInputRule,
    ResultCompletenessRule, StepConfidenceRule, StepDescriptionRule, StepSequenceRule,
    ValidationSettings,
};

use serde::{Deserialize, Serialize};

use crate::model::{ReasoningResult, ReasoningStep};

/// Severity of a finding, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note.
    Info,
    /// Suspicious but usable.
    Warning,
    /// Wrong, but reasoning can continue.
    Error,
    /// Structurally invalid; blocks the subject.
    Critical,
}

impl Severity {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubjectRef {
    /// The problem statement.
    Input,
    /// A step, by index.
    Step {
        /// Step index.
        index: usize,
    },
    /// The result as a whole.
    Result,
}

/// A single finding produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Identifier of the rule that produced it.
    pub rule_id: String,
    /// Severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// What the finding concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectRef>,
}

impl ValidationResult {
    /// Create a new finding.
    #[must_use]
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            subject: None,
        }
    }

    /// Attach the subject.
    #[must_use]
    pub const fn with_subject(mut self, subject: SubjectRef) -> Self {
        self.subject = Some(subject);
        self
    }
}

/// Aggregated findings for one validation run or one whole call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationSummary {
    /// Number of `info` findings.
    pub info: usize,
    /// Number of `warning` findings.
    pub warning: usize,
    /// Number of `error` findings.
    pub error: usize,
    /// Number of `critical` findings.
    pub critical: usize,
    /// Set when any `critical` finding exists.
    pub blocking: bool,
    /// Findings in the order they were produced.
    pub findings: Vec<ValidationResult>,
}

impl ValidationSummary {
    /// Build a summary from findings.
    #[must_use]
    pub fn from_findings(findings: Vec<ValidationResult>) -> Self {
        let mut summary = Self::default();
        for finding in findings {
            summary.push(finding);
        }
        summary
    }

    /// Add one finding.
    pub fn push(&mut self, finding: ValidationResult) {
        match finding.severity {
            Severity::Info => self.info += 1,
            Severity::Warning => self.warning += 1,
            Severity::Error => self.error += 1,
            Severity::Critical => {
                self.critical += 1;
                self.blocking = true;
            }
        }
        self.findings.push(finding);
    }

    /// Fold another summary into this one.
    pub fn merge(&mut self, other: Self) {
        for finding in other.findings {
            self.push(finding);
        }
    }

    /// Number of findings with the given severity.
    #[must_use]
    pub const fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
            Severity::Critical => self.critical,
        }
    }

    /// Returns true if there are no findings at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings produced by a given rule.
    pub fn by_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a ValidationResult> {
        self.findings.iter().filter(move |f| f.rule_id == rule_id)
    }

    /// One-line description of the `error` and `critical` findings.
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self
            .findings
            .iter()
            .filter(|f| f.severity >= Severity::Error)
            .map(|f| format!("{}: {}", f.rule_id, f.message))
            .collect();
        if parts.is_empty() {
            "no blocking findings".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Kind of subject a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleTarget {
    /// Raw problem text.
    Input,
    /// A single step.
    Step,
    /// A full result.
    Result,
    /// Consistency across all steps of a sequence.
    CrossStep,
}

/// A value being validated.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    /// Raw problem text.
    Input(&'a str),
    /// A single step.
    Step(&'a ReasoningStep),
    /// A full result.
    Result(&'a ReasoningResult),
    /// A step sequence.
    Steps(&'a [ReasoningStep]),
}

impl Subject<'_> {
    /// The target kind of this subject.
    #[must_use]
    pub const fn target(&self) -> RuleTarget {
        match self {
            Self::Input(_) => RuleTarget::Input,
            Self::Step(_) => RuleTarget::Step,
            Self::Result(_) => RuleTarget::Result,
            Self::Steps(_) => RuleTarget::CrossStep,
        }
    }
}

/// Default rule priority.
pub const DEFAULT_PRIORITY: u32 = 100;

/// A pluggable check producing severity-tagged findings.
///
/// Rules are pure functions of their subject.
pub trait ValidationRule: Send + Sync {
    /// Stable identifier reported in findings.
    fn id(&self) -> &str;

    /// Kind of subject this rule inspects.
    fn target(&self) -> RuleTarget;

    /// Execution order; lower runs first.
    fn priority(&self) -> u32 {
        DEFAULT_PRIORITY
    }

    /// Inspect the subject. Only called for subjects matching [`Self::target`].
    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult>;
}

/// A bundle of domain rules registered together.
pub trait ValidationPlugin {
    /// Plugin name, for logging.
    fn name(&self) -> &str;

    /// Rules contributed by the plugin.
    fn rules(&self) -> Vec<Box<dyn ValidationRule>>;
}

/// Ordered, immutable collection of rules.
pub struct RuleRegistry {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl RuleRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    /// Registry holding the built-in rules with default settings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::builder()
            .with_builtin_rules(&ValidationSettings::default())
            .build()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule identifiers in execution order.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Validate raw problem text.
    #[must_use]
    pub fn validate_input(&self, input: &str) -> ValidationSummary {
        self.run(&Subject::Input(input))
    }

    /// Validate a single step.
    #[must_use]
    pub fn validate_step(&self, step: &ReasoningStep) -> ValidationSummary {
        self.run(&Subject::Step(step))
    }

    /// Validate consistency across a step sequence.
    #[must_use]
    pub fn validate_steps(&self, steps: &[ReasoningStep]) -> ValidationSummary {
        self.run(&Subject::Steps(steps))
    }

    /// Validate a full result: result rules followed by cross-step rules.
    #[must_use]
    pub fn validate_result(&self, result: &ReasoningResult) -> ValidationSummary {
        let mut summary = self.run(&Subject::Result(result));
        summary.merge(self.validate_steps(&result.steps));
        summary
    }

    fn run(&self, subject: &Subject<'_>) -> ValidationSummary {
        let target = subject.target();
        let mut summary = ValidationSummary::default();
        for rule in self.rules.iter().filter(|r| r.target() == target) {
            for finding in rule.check(subject) {
                summary.push(finding);
            }
        }
        summary
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rule_ids())
            .finish()
    }
}

/// Builder for [`RuleRegistry`].
#[derive(Default)]
pub struct RuleRegistryBuilder {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl RuleRegistryBuilder {
    /// Register one rule.
    #[must_use]
    pub fn with_rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Register the built-in rules.
    #[must_use]
    pub fn with_builtin_rules(self, settings: &ValidationSettings) -> Self {
        self.with_rule(NonEmptyInputRule)
            .with_rule(InputLengthRule::new(
                settings.min_input_chars,
                settings.max_input_chars,
            ))
            .with_rule(StepDescriptionRule)
            .with_rule(StepConfidenceRule)
            .with_rule(ResultCompletenessRule)
            .with_rule(ConfidenceConsistencyRule::new(settings.confidence_tolerance))
            .with_rule(StepSequenceRule)
            .with_rule(ConfidenceOutlierRule::new(settings.outlier_sigma))
    }

    /// Register every rule of a plugin.
    #[must_use]
    pub fn with_plugin(mut self, plugin: &dyn ValidationPlugin) -> Self {
        let rules = plugin.rules();
        tracing::debug!(
            plugin = plugin.name(),
            rules = rules.len(),
            "Registering validation plugin"
        );
        self.rules.extend(rules);
        self
    }

    /// Freeze the registry, ordering rules by priority.
    ///
    /// The sort is stable: rules with equal priority keep registration order.
    #[must_use]
    pub fn build(mut self) -> RuleRegistry {
        self.rules.sort_by_key(|r| r.priority());
        RuleRegistry { rules: self.rules }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{ResultStatus, StrategyKind};
    use pretty_assertions::assert_eq;
    use static_assertions::assert_impl_all;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    assert_impl_all!(RuleRegistry: Send, Sync);

    struct FixedRule {
        id: &'static str,
        priority: u32,
        severity: Severity,
        calls: Arc<AtomicUsize>,
    }

    impl ValidationRule for FixedRule {
        fn id(&self) -> &str {
            self.id
        }

        fn target(&self) -> RuleTarget {
            RuleTarget::Input
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn check(&self, _subject: &Subject<'_>) -> Vec<ValidationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![ValidationResult::new(self.id, self.severity, "fixed")]
        }
    }

    fn fixed(id: &'static str, priority: u32, severity: Severity) -> FixedRule {
        FixedRule {
            id,
            priority,
            severity,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[test]
    fn test_rules_run_in_priority_order() {
        let registry = RuleRegistry::builder()
            .with_rule(fixed("late", 50, Severity::Info))
            .with_rule(fixed("early", 1, Severity::Info))
            .with_rule(fixed("middle_a", 10, Severity::Info))
            .with_rule(fixed("middle_b", 10, Severity::Info))
            .build();

        assert_eq!(
            registry.rule_ids(),
            vec!["early", "middle_a", "middle_b", "late"]
        );
        let summary = registry.validate_input("anything");
        let order: Vec<&str> = summary.findings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(order, vec!["early", "middle_a", "middle_b", "late"]);
    }

    #[test]
    fn test_critical_does_not_short_circuit() {
        let after = fixed("after", 10, Severity::Warning);
        let calls = Arc::clone(&after.calls);
        let registry = RuleRegistry::builder()
            .with_rule(fixed("first", 1, Severity::Critical))
            .with_rule(after)
            .build();

        let summary = registry.validate_input("x");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(summary.blocking);
        assert_eq!(summary.critical, 1);
        assert_eq!(summary.warning, 1);
    }

    #[test]
    fn test_rules_only_run_for_their_target() {
        let rule = fixed("input_only", 1, Severity::Info);
        let calls = Arc::clone(&rule.calls);
        let registry = RuleRegistry::builder().with_rule(rule).build();

        let step = ReasoningStep::new(0, "step", "", 0.5);
        let summary = registry.validate_step(&step);
        assert!(summary.is_clean());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_summary_counts_and_merge() {
        let mut a = ValidationSummary::from_findings(vec![
            ValidationResult::new("r1", Severity::Info, "i"),
            ValidationResult::new("r2", Severity::Warning, "w"),
        ]);
        let b = ValidationSummary::from_findings(vec![
            ValidationResult::new("r3", Severity::Error, "e"),
            ValidationResult::new("r4", Severity::Critical, "c"),
        ]);
        assert!(!a.blocking);
        a.merge(b);
        assert_eq!(
            (a.info, a.warning, a.error, a.critical),
            (1, 1, 1, 1)
        );
        assert!(a.blocking);
        assert_eq!(a.describe(), "r3: e; r4: c");
        assert_eq!(a.by_rule("r2").count(), 1);
    }

    #[test]
    fn test_describe_without_errors() {
        let s = ValidationSummary::from_findings(vec![ValidationResult::new(
            "r",
            Severity::Warning,
            "w",
        )]);
        assert_eq!(s.describe(), "no blocking findings");
    }

    #[test]
    fn test_validate_result_is_idempotent() {
        let registry = RuleRegistry::with_defaults();
        let steps = vec![
            ReasoningStep::new(0, "a", "", 0.9).completed(),
            ReasoningStep::new(1, "b", "", 0.8).completed(),
            ReasoningStep::new(2, "c", "", 0.85).completed(),
            ReasoningStep::new(3, "d", "", 0.1).completed(),
        ];
        let mut result = ReasoningResult::new(
            "problem",
            StrategyKind::ChainOfThought,
            steps,
            ResultStatus::Completed,
        );
        result.confidence = 0.99;

        let first = registry.validate_result(&result);
        let second = registry.validate_result(&result);
        assert_eq!(first, second);
        assert!(first.by_rule("confidence_consistency").count() == 1);
        assert!(first.by_rule("result_completeness").count() == 1);
        assert!(first.by_rule("confidence_outlier").count() >= 1);
    }

    #[test]
    fn test_default_registry_contents() {
        let registry = RuleRegistry::default();
        assert_eq!(registry.len(), 8);
        assert!(!registry.is_empty());
        assert!(format!("{registry:?}").contains("non_empty_input"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Error);
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::Critical.to_string(), "critical");
    }
}
