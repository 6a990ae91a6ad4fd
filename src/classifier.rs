//! Default advisory problem classifier.
//!
//! [`KeywordClassifier`] looks for surface cues only. Its output picks the
//! generation context and the default strategy; it never affects control
//! flow inside a strategy.

use crate::traits::{Classification, DecompositionHint, ProblemClassifier, ProblemType};

const MATH_KEYWORDS: &[&str] = &[
    "calculate",
    "compute",
    "sum",
    "product",
    "solve",
    "equation",
    "derivative",
    "integral",
    "multiply",
    "divide",
    "percent",
    "average",
    "how many",
    "how much",
];

const LOGIC_KEYWORDS: &[&str] = &[
    "if ",
    "then",
    "therefore",
    "implies",
    "all ",
    "none ",
    "prove",
    "deduce",
    "valid",
    "true",
    "false",
    "premise",
    "conclusion",
];

const PLANNING_KEYWORDS: &[&str] = &[
    "plan",
    "schedule",
    "steps to",
    "roadmap",
    "itinerary",
    "organize",
    "prioritize",
    "sequence",
    "milestone",
];

const DESIGN_KEYWORDS: &[&str] = &[
    "design",
    "architect",
    "build a",
    "create a",
    "layout",
    "structure for",
    "propose",
    "system for",
];

const AMBIGUITY_KEYWORDS: &[&str] = &[
    " or ",
    "alternatively",
    "options",
    "trade-off",
    "tradeoff",
    "compare",
    "best way",
    "either",
];

/// Keyword-based [`ProblemClassifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Create a new classifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn looks_arithmetic(text: &str) -> bool {
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_operator = text
        .chars()
        .any(|c| matches!(c, '+' | '*' | '/' | '=' | '×' | '÷' | '^'))
        || text.contains(" - ");
    has_digit && has_operator
}

impl ProblemClassifier for KeywordClassifier {
    fn classify(&self, problem: &str) -> Classification {
        let text = format!(" {} ", problem.to_lowercase());
        let ambiguous = contains_any(&text, AMBIGUITY_KEYWORDS);

        let (problem_type, hint) = if looks_arithmetic(&text)
            || (contains_any(&text, MATH_KEYWORDS) && text.chars().any(|c| c.is_ascii_digit()))
        {
            (ProblemType::Mathematical, DecompositionHint::Linear)
        } else if contains_any(&text, PLANNING_KEYWORDS) {
            (ProblemType::Planning, DecompositionHint::MultiPath)
        } else if contains_any(&text, DESIGN_KEYWORDS) {
            (ProblemType::Design, DecompositionHint::MultiPath)
        } else if contains_any(&text, LOGIC_KEYWORDS) {
            let hint = if ambiguous {
                DecompositionHint::MultiPath
            } else {
                DecompositionHint::Linear
            };
            (ProblemType::Logical, hint)
        } else if ambiguous {
            (ProblemType::General, DecompositionHint::MultiPath)
        } else {
            (ProblemType::General, DecompositionHint::Unknown)
        };

        tracing::debug!(
            problem_type = problem_type.as_str(),
            hint = ?hint,
            "Problem classified"
        );
        Classification::new(problem_type, hint)
    }
}
