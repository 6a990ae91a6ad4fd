//! Domain-specific validation plugins.
//!
//! - [`MathPlugin`]: checks arithmetic equalities written in step text
//! - [`NumericRangePlugin`]: flags numbers outside an expected range

use super::{
    RuleTarget, Severity, Subject, SubjectRef, ValidationPlugin, ValidationResult, ValidationRule,
};

const EQUALITY_TOLERANCE: f64 = 1e-6;

/// Deepest parenthesis or unary-minus nesting the evaluator accepts.
const MAX_NESTING: usize = 64;

/// Registers [`MathExpressionRule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MathPlugin;

impl ValidationPlugin for MathPlugin {
    fn name(&self) -> &str {
        "math"
    }

    fn rules(&self) -> Vec<Box<dyn ValidationRule>> {
        vec![Box::new(MathExpressionRule)]
    }
}

/// Evaluates `lhs = rhs` arithmetic found in a step description.
///
/// Only fragments made entirely of numbers, `+ - * / × ÷` and parentheses
/// are checked; anything else is ignored. A false equality is an `error`,
/// unbalanced parentheses a `warning`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathExpressionRule;

impl ValidationRule for MathExpressionRule {
    fn id(&self) -> &str {
        "math_expression"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Step
    }

    fn priority(&self) -> u32 {
        50
    }

    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        let Subject::Step(step) = subject else {
            return vec![];
        };
        let text = step.description.as_str();
        let mut findings = Vec::new();

        if !parentheses_balanced(text) {
            findings.push(
                ValidationResult::new(self.id(), Severity::Warning, "unbalanced parentheses")
                    .with_subject(SubjectRef::Step { index: step.index }),
            );
        }

        for (lhs, rhs) in equalities(text) {
            let (Some(left), Some(right)) = (evaluate(&lhs), evaluate(&rhs)) else {
                continue;
            };
            if (left - right).abs() > EQUALITY_TOLERANCE * right.abs().max(1.0) {
                findings.push(
                    ValidationResult::new(
                        self.id(),
                        Severity::Error,
                        format!("{lhs} = {rhs} does not hold (left side evaluates to {left})"),
                    )
                    .with_subject(SubjectRef::Step { index: step.index }),
                );
            }
        }
        findings
    }
}

/// Registers [`NumericRangeRule`] with the given bounds.
#[derive(Debug, Clone, Copy)]
pub struct NumericRangePlugin {
    min: f64,
    max: f64,
}

impl NumericRangePlugin {
    /// Accept numbers in `[min, max]`.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl ValidationPlugin for NumericRangePlugin {
    fn name(&self) -> &str {
        "numeric_range"
    }

    fn rules(&self) -> Vec<Box<dyn ValidationRule>> {
        vec![Box::new(NumericRangeRule::new(self.min, self.max))]
    }
}

/// Warns about numbers in a step description outside `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct NumericRangeRule {
    min: f64,
    max: f64,
}

impl NumericRangeRule {
    /// Accept numbers in `[min, max]`.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl ValidationRule for NumericRangeRule {
    fn id(&self) -> &str {
        "numeric_range"
    }

    fn target(&self) -> RuleTarget {
        RuleTarget::Step
    }

    fn priority(&self) -> u32 {
        60
    }

    fn check(&self, subject: &Subject<'_>) -> Vec<ValidationResult> {
        let Subject::Step(step) = subject else {
            return vec![];
        };
        numbers(&step.description)
            .into_iter()
            .filter(|n| *n < self.min || *n > self.max)
            .map(|n| {
                ValidationResult::new(
                    self.id(),
                    Severity::Warning,
                    format!("value {n} is outside [{}, {}]", self.min, self.max),
                )
                .with_subject(SubjectRef::Step { index: step.index })
            })
            .collect()
    }
}

fn parentheses_balanced(text: &str) -> bool {
    let mut depth: i64 = 0;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn is_expression_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '×' | '÷' | '(' | ')' | ' ')
}

/// Extract `(lhs, rhs)` pairs around each standalone `=`.
fn equalities(text: &str) -> Vec<(String, String)> {
    let chars: Vec<char> = text.chars().collect();
    let mut pairs = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        if c != '=' {
            continue;
        }
        let prev = i.checked_sub(1).and_then(|p| chars.get(p)).copied();
        let next = chars.get(i + 1).copied();
        if matches!(prev, Some('=' | '<' | '>' | '!')) || next == Some('=') {
            continue;
        }

        let start = chars[..i]
            .iter()
            .rposition(|c| !is_expression_char(*c))
            .map_or(0, |p| p + 1);
        let end = chars[i + 1..]
            .iter()
            .position(|c| !is_expression_char(*c))
            .map_or(chars.len(), |p| i + 1 + p);

        let lhs = clean_fragment(&chars[start..i]);
        let rhs = clean_fragment(&chars[i + 1..end]);
        if lhs.chars().any(|c| c.is_ascii_digit()) && rhs.chars().any(|c| c.is_ascii_digit()) {
            pairs.push((lhs, rhs));
        }
    }
    pairs
}

fn clean_fragment(chars: &[char]) -> String {
    let s: String = chars.iter().collect();
    s.trim().trim_end_matches('.').trim().to_string()
}

/// Numbers appearing in free text.
fn numbers(text: &str) -> Vec<f64> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let negative = i > 0
                && chars[i - 1] == '-'
                && (i == 1 || !chars[i - 2].is_alphanumeric());
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let literal: String = chars[start..i].iter().collect();
            if let Ok(value) = literal.parse::<f64>() {
                out.push(if negative { -value } else { value });
            }
        } else {
            i += 1;
        }
    }
    out
}

/// Evaluate an arithmetic expression. Returns `None` on any parse error
/// or division by zero.
fn evaluate(expression: &str) -> Option<f64> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    (parser.pos == parser.tokens.len() && value.is_finite()).then_some(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(expression: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' => {}
            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' | '×' => tokens.push(Token::Star),
            '/' | '÷' => tokens.push(Token::Slash),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            _ if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i + 1 < chars.len() && (chars[i + 1].is_ascii_digit() || chars[i + 1] == '.')
                {
                    i += 1;
                }
                let literal: String = chars[start..=i].iter().collect();
                tokens.push(Token::Number(literal.parse().ok()?));
            }
            _ => return None,
        }
        i += 1;
    }
    Some(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == Token::Star {
                value * rhs
            } else if rhs == 0.0 {
                return None;
            } else {
                value / rhs
            };
        }
        Some(value)
    }

    fn factor(&mut self) -> Option<f64> {
        match self.bump()? {
            Token::Number(n) => Some(n),
            Token::Minus => self.nested(|p| p.factor().map(|v| -v)),
            Token::LParen => self.nested(|p| {
                let value = p.expr()?;
                (p.bump()? == Token::RParen).then_some(value)
            }),
            _ => None,
        }
    }

    /// Run `parse` one nesting level deeper; `None` past [`MAX_NESTING`].
    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Option<f64>) -> Option<f64> {
        if self.depth >= MAX_NESTING {
            return None;
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }
}
