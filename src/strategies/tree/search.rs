//! Search algorithms over the thought tree.
//!
//! BFS and Beam expand one depth level at a time. Every candidate call of a
//! level is issued concurrently and the search waits for all of them before
//! creating nodes, which happens in plan order so node ids do not depend on
//! completion order. DFS and A* expand one node at a time, one call at a
//! time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use futures_util::future::join_all;
use tracing::{debug, warn};

use super::arena::{NewChild, NodeId, ThoughtTree};
use super::scoring::rank;
use super::{SearchAlgorithm, TreeConfig};
use crate::error::OracleError;
use crate::model::{sanitize_confidence, ReasoningStep};
use crate::strategies::core::{evaluate_with_retry, propose_with_retry};
use crate::traits::{Classification, Oracle, ProposalContext, ProposalPurpose};
use crate::validation::{RuleRegistry, Severity, SubjectRef, ValidationResult, ValidationSummary};

/// Counters collected during a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SearchStats {
    pub nodes_expanded: usize,
    pub children_discarded: usize,
    pub oracle_failures: usize,
    pub budget_hit: bool,
    pub terminal_found: bool,
    pub frontier_sizes: Vec<usize>,
}

/// Everything a finished search hands back.
#[derive(Debug)]
pub(crate) struct SearchOutcome {
    pub tree: ThoughtTree,
    pub stats: SearchStats,
    pub findings: ValidationSummary,
}

/// Outcome of one candidate call.
#[derive(Debug)]
enum Candidate {
    Accepted(NewChild),
    /// The oracle reported the parent path as complete without a new step.
    Completes(Option<serde_json::Value>),
    Discarded(String),
    Failed(OracleError),
}

/// One search invocation; owns its tree.
pub(crate) struct Search<'a, O: Oracle> {
    oracle: &'a O,
    registry: &'a RuleRegistry,
    config: &'a TreeConfig,
    max_retries: u32,
    problem: &'a str,
    classification: Classification,
    tree: ThoughtTree,
    stats: SearchStats,
    findings: ValidationSummary,
}

impl<'a, O: Oracle> Search<'a, O> {
    pub(crate) fn new(
        oracle: &'a O,
        registry: &'a RuleRegistry,
        config: &'a TreeConfig,
        max_retries: u32,
        problem: &'a str,
        classification: Classification,
    ) -> Self {
        Self {
            oracle,
            registry,
            config,
            max_retries,
            problem,
            classification,
            tree: ThoughtTree::new(),
            stats: SearchStats::default(),
            findings: ValidationSummary::default(),
        }
    }

    pub(crate) async fn run(mut self) -> SearchOutcome {
        match self.config.search_algorithm {
            SearchAlgorithm::Bfs => self.layered(None).await,
            SearchAlgorithm::Beam => self.layered(Some(self.config.beam_width)).await,
            SearchAlgorithm::Dfs => self.depth_first().await,
            SearchAlgorithm::AStar => self.best_first().await,
        }
        SearchOutcome {
            tree: self.tree,
            stats: self.stats,
            findings: self.findings,
        }
    }

    fn remaining(&self) -> usize {
        self.config.max_nodes.saturating_sub(self.tree.len())
    }

    fn expandable(&self, id: NodeId) -> bool {
        let node = self.tree.node(id);
        node.depth < self.config.max_depth && !node.is_terminal
    }

    /// Level-by-level expansion. With `beam`, each new level is ranked and
    /// cut down to the beam width before it becomes the frontier.
    async fn layered(&mut self, beam: Option<usize>) {
        let mut frontier = vec![NodeId::ROOT];

        while !frontier.is_empty() {
            let mut plan: Vec<(NodeId, usize)> = Vec::new();
            let mut remaining = self.remaining();
            'plan: for &id in &frontier {
                if !self.expandable(id) {
                    continue;
                }
                for candidate in 0..self.config.branching_factor {
                    if remaining == 0 {
                        self.stats.budget_hit = true;
                        break 'plan;
                    }
                    plan.push((id, candidate));
                    remaining -= 1;
                }
            }
            if plan.is_empty() {
                break;
            }

            let mut parents: Vec<NodeId> = plan.iter().map(|(id, _)| *id).collect();
            parents.dedup();
            self.stats.nodes_expanded += parents.len();
            debug!(
                frontier = frontier.len(),
                calls = plan.len(),
                "Expanding level"
            );

            let requests: Vec<(Vec<ReasoningStep>, usize)> = plan
                .iter()
                .map(|(id, candidate)| (self.tree.path_steps(*id), *candidate))
                .collect();
            let this = &*self;
            let outcomes = join_all(
                requests
                    .into_iter()
                    .map(|(path, candidate)| this.generate(path, candidate)),
            )
            .await;

            let mut next = Vec::new();
            for ((parent, _), outcome) in plan.into_iter().zip(outcomes) {
                if let Some(child) = self.apply(parent, outcome) {
                    next.push(child);
                }
            }
            if self.stats.terminal_found {
                break;
            }

            if let Some(width) = beam {
                rank(&self.tree, &mut next, self.config.evaluation_strategy);
                next.truncate(width);
                self.stats.frontier_sizes.push(next.len());
            }
            frontier = next;
        }
    }

    async fn depth_first(&mut self) {
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            if !self.expandable(id) {
                continue;
            }
            let children = self.expand_sequential(id).await;
            if self.stats.terminal_found || self.stats.budget_hit {
                break;
            }
            // First child on top.
            stack.extend(children.into_iter().rev());
        }
    }

    async fn best_first(&mut self) {
        let mut open = BinaryHeap::new();
        open.push(Frontier {
            priority: self.priority(NodeId::ROOT),
            id: NodeId::ROOT,
        });

        while let Some(Frontier { id, .. }) = open.pop() {
            if !self.expandable(id) {
                continue;
            }
            let children = self.expand_sequential(id).await;
            if self.stats.terminal_found || self.stats.budget_hit {
                break;
            }
            for child in children {
                open.push(Frontier {
                    priority: self.priority(child),
                    id: child,
                });
            }
        }
    }

    /// `f = cost_weight * g + heuristic_weight * (1 - completeness)`.
    fn priority(&self, id: NodeId) -> f64 {
        let node = self.tree.node(id);
        self.config.astar_cost_weight * node.path_cost
            + self.config.astar_heuristic_weight * (1.0 - node.scores.completeness)
    }

    /// Generate the children of `id` one call at a time.
    async fn expand_sequential(&mut self, id: NodeId) -> Vec<NodeId> {
        let path = self.tree.path_steps(id);
        let mut children = Vec::new();

        for candidate in 0..self.config.branching_factor {
            if self.remaining() == 0 {
                self.stats.budget_hit = true;
                break;
            }
            if candidate == 0 {
                self.stats.nodes_expanded += 1;
            }
            let outcome = self.generate(path.clone(), candidate).await;
            if let Some(child) = self.apply(id, outcome) {
                children.push(child);
            }
            if self.stats.terminal_found {
                break;
            }
        }
        children
    }

    /// Ask the oracle for one candidate continuation of `path` and judge it.
    async fn generate(&self, path: Vec<ReasoningStep>, candidate: usize) -> Candidate {
        let index = path.len();
        let context = ProposalContext::next(self.problem, self.classification, path.clone())
            .with_purpose(ProposalPurpose::Branch {
                candidate,
                of: self.config.branching_factor,
            });

        let proposal = match propose_with_retry(self.oracle, context, self.max_retries).await {
            Ok(p) => p,
            Err(e) => return Candidate::Failed(e),
        };
        if proposal.is_completion_signal() {
            return Candidate::Completes(proposal.final_answer);
        }

        let step = proposal.to_step(index);
        let findings = self.registry.validate_step(&step);
        if findings.blocking {
            return Candidate::Discarded(findings.describe());
        }
        let step = step.completed();

        let completeness = if let Some(c) = proposal.completeness {
            sanitize_confidence(c)
        } else {
            let mut full = path;
            full.push(step.clone());
            match evaluate_with_retry(self.oracle, self.problem, &full, self.max_retries).await {
                Ok(scores) => sanitize_confidence(scores.completeness),
                Err(e) => {
                    warn!(error = %e, "Path evaluation failed, assuming no progress");
                    0.0
                }
            }
        };

        Candidate::Accepted(NewChild {
            step,
            completeness,
            is_terminal: proposal.is_terminal,
            final_answer: proposal.final_answer,
        })
    }

    /// Turn a candidate into a node, or record why it was dropped.
    fn apply(&mut self, parent: NodeId, candidate: Candidate) -> Option<NodeId> {
        let depth = self.tree.node(parent).depth + 1;
        match candidate {
            Candidate::Accepted(child) => {
                let terminal = child.is_terminal;
                let id = self.tree.add_child(parent, child);
                debug!(node = id.index(), depth, terminal, "Node created");
                if terminal {
                    self.stats.terminal_found = true;
                }
                Some(id)
            }
            Candidate::Completes(answer) if parent != NodeId::ROOT => {
                debug!(node = parent.index(), "Path reported complete");
                self.tree.mark_terminal(parent, answer);
                self.stats.terminal_found = true;
                None
            }
            Candidate::Completes(_) => {
                self.discard(parent, depth, "oracle proposed no step".to_string());
                None
            }
            Candidate::Discarded(reason) => {
                self.discard(parent, depth, reason);
                None
            }
            Candidate::Failed(e) => {
                warn!(parent = parent.index(), error = %e, "Branch generation failed");
                self.stats.oracle_failures += 1;
                self.findings.push(
                    ValidationResult::new(
                        "oracle_failure",
                        Severity::Warning,
                        format!("branch under node {} dropped: {e}", parent.index()),
                    )
                    .with_subject(SubjectRef::Step { index: depth - 1 }),
                );
                None
            }
        }
    }

    fn discard(&mut self, parent: NodeId, depth: usize, reason: String) {
        warn!(parent = parent.index(), %reason, "Child discarded");
        self.stats.children_discarded += 1;
        self.findings.push(
            ValidationResult::new(
                "child_discarded",
                Severity::Warning,
                format!("candidate under node {} discarded: {reason}", parent.index()),
            )
            .with_subject(SubjectRef::Step { index: depth - 1 }),
        );
    }
}

/// A* open-set entry: lowest priority first, then lowest id.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    priority: f64,
    id: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both keys.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.id.cmp(&self.id))
    }
}
