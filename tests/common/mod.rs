//! Deterministic oracle shared by the integration and property suites.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reasoning_engine::error::OracleError;
use reasoning_engine::model::ReasoningStep;
use reasoning_engine::traits::{Oracle, PathScores, Proposal, ProposalContext, ProposalPurpose};
use tokio::sync::Notify;

/// Oracle whose replies depend only on the request.
///
/// - `Next`: the scripted proposal at `history.len()`, then a completion
///   signal once the script runs out
/// - `Refine`: the refinement reply, or the previous step unchanged
/// - `Branch`: "depth D option K" with confidence falling by candidate,
///   terminal at `terminal_depth`
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    chain: Vec<Proposal>,
    refinement: Option<Proposal>,
    terminal_depth: Option<usize>,
    stall: bool,
    started: Notify,
    proposals: AtomicUsize,
    refinements: AtomicUsize,
    evaluations: AtomicUsize,
}

impl ScriptedOracle {
    /// Oracle answering `Next` requests from `chain`.
    pub fn chain(chain: Vec<Proposal>) -> Self {
        Self {
            chain,
            ..Self::default()
        }
    }

    /// Oracle for tree searches that never terminates a path.
    pub fn branching() -> Self {
        Self::default()
    }

    /// Oracle that never replies.
    pub fn stalled() -> Self {
        Self {
            stall: true,
            ..Self::default()
        }
    }

    /// Reply used for every refinement request.
    pub fn with_refinement(mut self, proposal: Proposal) -> Self {
        self.refinement = Some(proposal);
        self
    }

    /// Make branch candidates at `depth` terminal.
    pub fn with_terminal_depth(mut self, depth: usize) -> Self {
        self.terminal_depth = Some(depth);
        self
    }

    /// Wait until the first request reaches the oracle.
    pub async fn started(&self) {
        self.started.notified().await;
    }

    pub fn proposals(&self) -> usize {
        self.proposals.load(Ordering::SeqCst)
    }

    pub fn refinements(&self) -> usize {
        self.refinements.load(Ordering::SeqCst)
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    fn branch(&self, depth: usize, candidate: usize) -> Proposal {
        #[allow(clippy::cast_precision_loss)]
        let confidence = (0.9 - 0.1 * candidate as f64).max(0.1);
        #[allow(clippy::cast_precision_loss)]
        let completeness = depth as f64 / (depth as f64 + 1.0);
        let proposal = Proposal::step(format!("depth {depth} option {candidate}"), confidence)
            .with_rationale(format!("continue at depth {depth}"))
            .with_completeness(completeness);
        if self.terminal_depth == Some(depth) {
            proposal
                .terminal()
                .with_final_answer(serde_json::json!(format!("answer {candidate}")))
        } else {
            proposal
        }
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn propose(&self, context: ProposalContext) -> Result<Proposal, OracleError> {
        self.started.notify_one();
        if self.stall {
            std::future::pending::<()>().await;
        }
        self.proposals.fetch_add(1, Ordering::SeqCst);

        let proposal = match context.purpose {
            ProposalPurpose::Next => self
                .chain
                .get(context.history.len())
                .cloned()
                .unwrap_or_else(Proposal::done),
            ProposalPurpose::Refine { previous, .. } => {
                self.refinements.fetch_add(1, Ordering::SeqCst);
                self.refinement.clone().unwrap_or_else(|| {
                    Proposal::step(previous.description, previous.confidence)
                })
            }
            ProposalPurpose::Branch { candidate, .. } => {
                self.branch(context.history.len() + 1, candidate)
            }
        };
        Ok(proposal)
    }

    async fn evaluate(
        &self,
        _problem: String,
        path: Vec<ReasoningStep>,
    ) -> Result<PathScores, OracleError> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        #[allow(clippy::cast_precision_loss)]
        let efficiency = 1.0 / path.len().max(1) as f64;
        Ok(PathScores::new(0.5, 0.5, efficiency))
    }
}

/// `n` confident non-terminal steps.
pub fn steady_steps(n: usize, confidence: f64) -> Vec<Proposal> {
    (0..n)
        .map(|i| {
            Proposal::step(format!("Step {}", i + 1), confidence)
                .with_rationale(format!("reason {}", i + 1))
        })
        .collect()
}
