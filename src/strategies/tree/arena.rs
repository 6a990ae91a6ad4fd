//! Arena-backed thought tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Parent
//! links are plain indices, so the tree has no ownership cycles and is
//! dropped in one piece when a search ends or is cancelled.

#![allow(clippy::missing_const_for_fn)]

use serde::Serialize;

use crate::model::ReasoningStep;
use crate::traits::PathScores;

/// Index of a node in its [`ThoughtTree`], assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node.
    pub const ROOT: Self = Self(0);

    /// Creation order of the node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One candidate partial solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThoughtNode {
    /// This node's id.
    pub id: NodeId,
    /// Parent node; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Children in creation order.
    pub children: Vec<NodeId>,
    /// Distance from the root.
    pub depth: usize,
    /// The step this node adds; `None` for the root.
    pub step: Option<ReasoningStep>,
    /// Product of step confidences from the root to this node.
    pub path_confidence: f64,
    /// Sum of `1 - confidence` along the path.
    pub path_cost: f64,
    /// Per-criterion scores of the path ending here.
    pub scores: PathScores,
    /// The oracle reported this path as a complete solution.
    pub is_terminal: bool,
    /// Answer attached to a terminal node.
    pub final_answer: Option<serde_json::Value>,
}

impl ThoughtNode {
    /// Returns true for the root node.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns true if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Data for a new child node.
#[derive(Debug, Clone)]
pub(crate) struct NewChild {
    pub step: ReasoningStep,
    pub completeness: f64,
    pub is_terminal: bool,
    pub final_answer: Option<serde_json::Value>,
}

/// Tree of thought nodes owned by one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThoughtTree {
    nodes: Vec<ThoughtNode>,
}

impl ThoughtTree {
    /// Create a tree holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![ThoughtNode {
                id: NodeId::ROOT,
                parent: None,
                children: Vec::new(),
                depth: 0,
                step: None,
                path_confidence: 1.0,
                path_cost: 0.0,
                scores: PathScores::default(),
                is_terminal: false,
                final_answer: None,
            }],
        }
    }

    /// Number of nodes created, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ThoughtNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node by an id minted by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ThoughtNode {
        &self.nodes[id.0]
    }

    /// All nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &ThoughtNode> {
        self.nodes.iter()
    }

    /// Deepest depth reached.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Nodes at `depth`, in creation order.
    #[must_use]
    pub fn at_depth(&self, depth: usize) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.depth == depth)
            .map(|n| n.id)
            .collect()
    }

    /// Append a child under `parent`.
    ///
    /// The step index is rewritten to `depth - 1` so that any root-to-node
    /// path has contiguous indices.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn add_child(&mut self, parent: NodeId, child: NewChild) -> NodeId {
        let id = NodeId(self.nodes.len());
        let (depth, path_confidence, path_cost, confidence_sum) = {
            let p = self.node(parent);
            let confidence_sum = p.scores.confidence * p.depth as f64;
            (p.depth + 1, p.path_confidence, p.path_cost, confidence_sum)
        };

        let mut step = child.step;
        step.index = depth - 1;
        let confidence = step.confidence;

        let scores = PathScores::new(
            (confidence_sum + confidence) / depth as f64,
            child.completeness,
            1.0 / depth as f64,
        );

        self.nodes.push(ThoughtNode {
            id,
            parent: Some(parent),
            children: Vec::new(),
            depth,
            step: Some(step),
            path_confidence: path_confidence * confidence,
            path_cost: path_cost + (1.0 - confidence),
            scores,
            is_terminal: child.is_terminal,
            final_answer: child.final_answer,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Mark an existing node terminal.
    pub(crate) fn mark_terminal(&mut self, id: NodeId, final_answer: Option<serde_json::Value>) {
        let node = &mut self.nodes[id.0];
        node.is_terminal = true;
        if final_answer.is_some() {
            node.final_answer = final_answer;
        }
    }

    /// Ids from the first step to `id`, root excluded.
    #[must_use]
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if node.is_root() {
                break;
            }
            path.push(node_id);
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Steps along the path to `id`, root excluded.
    #[must_use]
    pub fn path_steps(&self, id: NodeId) -> Vec<ReasoningStep> {
        self.path(id)
            .into_iter()
            .filter_map(|n| self.node(n).step.clone())
            .collect()
    }
}

impl Default for ThoughtTree {
    fn default() -> Self {
        Self::new()
    }
}
