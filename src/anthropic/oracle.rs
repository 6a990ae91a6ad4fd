//! [`Oracle`] backed by the Anthropic Messages API.
//!
//! Each call sends one short prompt and expects one JSON object back. The
//! reply may be raw JSON, a fenced code block, or JSON embedded in prose.
//! Anything else is [`OracleError::Malformed`], which the engine retries.

use std::fmt::Write as _;

use async_trait::async_trait;
use serde::Deserialize;

use super::client::AnthropicClient;
use super::config::DEFAULT_MAX_TOKENS;
use super::types::{ApiMessage, ApiRequest};
use crate::error::OracleError;
use crate::model::ReasoningStep;
use crate::traits::{Oracle, PathScores, Proposal, ProposalContext, ProposalPurpose};

const SYSTEM_PROMPT: &str = "You are a careful step-by-step problem solver. \
Reply with exactly one JSON object and no other text.";

const PROPOSAL_SCHEMA: &str = r#"Reply as JSON:
{"step": "<one reasoning step>", "rationale": "<why it follows>", "confidence": <0..1>,
 "is_terminal": <true if this step completes the solution>, "completeness": <0..1 fraction of the problem solved after this step>,
 "final_answer": <the answer, only when is_terminal is true>}
If the steps so far already solve the problem, reply {"is_terminal": true, "final_answer": <answer>} with no step."#;

const EVALUATION_SCHEMA: &str = r#"Reply as JSON:
{"confidence": <0..1 how sound the steps are>, "completeness": <0..1 fraction of the problem solved>, "efficiency": <0..1 how direct the path is>}"#;

/// Wire shape of a proposal reply.
#[derive(Debug, Deserialize)]
struct ProposalReply {
    #[serde(default, alias = "step_text", alias = "description")]
    step: Option<String>,
    #[serde(default)]
    rationale: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    is_terminal: bool,
    #[serde(default)]
    completeness: Option<f64>,
    #[serde(default)]
    final_answer: Option<serde_json::Value>,
}

impl From<ProposalReply> for Proposal {
    fn from(reply: ProposalReply) -> Self {
        Self {
            step_text: reply.step,
            rationale: reply.rationale,
            confidence: reply.confidence,
            is_terminal: reply.is_terminal,
            completeness: reply.completeness,
            final_answer: reply.final_answer.filter(|v| !v.is_null()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EvaluationReply {
    confidence: f64,
    completeness: f64,
    #[serde(default)]
    efficiency: Option<f64>,
}

/// Anthropic-backed oracle.
#[derive(Debug)]
pub struct AnthropicOracle {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
}

impl AnthropicOracle {
    /// Create an oracle that sends requests for `model` through `client`.
    #[must_use]
    pub fn new(client: AnthropicClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Set the reply token limit.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn ask(
        &self,
        prompt: String,
        temperature: f64,
    ) -> Result<serde_json::Value, OracleError> {
        let request = ApiRequest::new(&self.model, self.max_tokens, vec![ApiMessage::user(prompt)])
            .with_system(SYSTEM_PROMPT)
            .with_temperature(temperature);
        let completion = self.client.complete(request).await?;
        tracing::debug!(
            tokens = completion.usage.total(),
            "Oracle reply received"
        );
        extract_json(&completion.text).ok_or_else(|| OracleError::Malformed {
            message: "reply contains no JSON object".to_string(),
        })
    }
}

#[async_trait]
impl Oracle for AnthropicOracle {
    async fn propose(&self, context: ProposalContext) -> Result<Proposal, OracleError> {
        // Alternatives need spread; linear steps should be stable.
        let temperature = match context.purpose {
            ProposalPurpose::Branch { .. } => 1.0,
            _ => 0.2,
        };
        let value = self.ask(proposal_prompt(&context), temperature).await?;
        parse_proposal(value)
    }

    async fn evaluate(
        &self,
        problem: String,
        path: Vec<ReasoningStep>,
    ) -> Result<PathScores, OracleError> {
        let value = self.ask(evaluation_prompt(&problem, &path), 0.0).await?;
        parse_scores(value, path.len())
    }
}

fn write_steps(prompt: &mut String, steps: &[ReasoningStep]) {
    if steps.is_empty() {
        prompt.push_str("Steps so far: none.\n");
        return;
    }
    prompt.push_str("Steps so far:\n");
    for step in steps {
        let _ = writeln!(
            prompt,
            "{}. {} (confidence {:.2})",
            step.index + 1,
            step.description,
            step.confidence
        );
    }
}

/// Build the user prompt for a proposal request.
fn proposal_prompt(context: &ProposalContext) -> String {
    let mut prompt = format!(
        "Problem ({}): {}\n",
        context.classification.problem_type.as_str(),
        context.problem
    );
    write_steps(&mut prompt, &context.history);

    match &context.purpose {
        ProposalPurpose::Next => prompt.push_str("Propose the next single step.\n"),
        ProposalPurpose::Refine { index, previous } => {
            let _ = writeln!(
                prompt,
                "Step {} was judged weak (confidence {:.2}): \"{}\". \
                 Propose a better replacement for that step only.",
                index + 1,
                previous.confidence,
                previous.description
            );
        }
        ProposalPurpose::Branch { candidate, of } => {
            let _ = writeln!(
                prompt,
                "Propose alternative continuation {} of {of}. \
                 Take a different approach than the other alternatives would.",
                candidate + 1
            );
        }
    }
    prompt.push_str(PROPOSAL_SCHEMA);
    prompt
}

fn evaluation_prompt(problem: &str, path: &[ReasoningStep]) -> String {
    let mut prompt = format!("Problem: {problem}\n");
    write_steps(&mut prompt, path);
    prompt.push_str("Score these steps as a partial solution.\n");
    prompt.push_str(EVALUATION_SCHEMA);
    prompt
}

fn parse_proposal(value: serde_json::Value) -> Result<Proposal, OracleError> {
    serde_json::from_value::<ProposalReply>(value)
        .map(Proposal::from)
        .map_err(|e| OracleError::Malformed {
            message: format!("proposal: {e}"),
        })
}

#[allow(clippy::cast_precision_loss)]
fn parse_scores(value: serde_json::Value, path_len: usize) -> Result<PathScores, OracleError> {
    let reply: EvaluationReply =
        serde_json::from_value(value).map_err(|e| OracleError::Malformed {
            message: format!("evaluation: {e}"),
        })?;
    let efficiency = reply
        .efficiency
        .unwrap_or_else(|| 1.0 / path_len.max(1) as f64);
    Ok(PathScores::new(reply.confidence, reply.completeness, efficiency))
}

/// Pull a JSON object out of a model reply.
///
/// Tried in order: the whole text, a ```` ```json ```` block, a plain
/// ```` ``` ```` block, then the outermost `{ ... }` span.
fn extract_json(text: &str) -> Option<serde_json::Value> {
    let object = |s: &str| {
        serde_json::from_str::<serde_json::Value>(s.trim())
            .ok()
            .filter(serde_json::Value::is_object)
    };

    if let Some(value) = object(text) {
        return Some(value);
    }

    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            if let Some(value) = object(&text[start..start + end]) {
                return Some(value);
            }
        }
    }

    if let Some(start) = text.find("```") {
        let start = start + 3;
        // Skip a language tag on the fence line.
        let start = text[start..].find('\n').map_or(start, |n| start + n + 1);
        if let Some(end) = text[start..].find("```") {
            if let Some(value) = object(&text[start..start + end]) {
                return Some(value);
            }
        }
    }

    let open = text.find('{')?;
    let close = text.rfind('}')?;
    if close > open {
        object(&text[open..=close])
    } else {
        None
    }
}
