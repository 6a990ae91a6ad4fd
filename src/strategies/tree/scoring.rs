//! Path evaluation and optimal-path selection.

use serde::{Deserialize, Serialize};

use super::arena::{NodeId, ThoughtNode, ThoughtTree};

/// How a root-to-leaf path is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStrategy {
    /// Mean step confidence along the path.
    Confidence,
    /// Oracle-reported fraction of sub-goals satisfied.
    Completeness,
    /// Inverse of path length.
    Efficiency,
    /// Equal-weighted mean of the three criteria.
    #[default]
    Hybrid,
}

impl EvaluationStrategy {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confidence => "confidence",
            Self::Completeness => "completeness",
            Self::Efficiency => "efficiency",
            Self::Hybrid => "hybrid",
        }
    }

    /// Score the path ending at `node`.
    #[must_use]
    pub fn score(&self, node: &ThoughtNode) -> f64 {
        let s = node.scores;
        match self {
            Self::Confidence => s.confidence,
            Self::Completeness => s.completeness,
            Self::Efficiency => s.efficiency,
            Self::Hybrid => (s.confidence + s.completeness + s.efficiency) / 3.0,
        }
    }
}

impl std::fmt::Display for EvaluationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EvaluationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confidence" => Ok(Self::Confidence),
            "completeness" => Ok(Self::Completeness),
            "efficiency" => Ok(Self::Efficiency),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(format!("Unknown evaluation strategy: {s}")),
        }
    }
}

/// Order `ids` best first under `evaluation`; equal scores keep the node
/// created first.
pub(crate) fn rank(tree: &ThoughtTree, ids: &mut [NodeId], evaluation: EvaluationStrategy) {
    ids.sort_by(|a, b| {
        let sa = evaluation.score(tree.node(*a));
        let sb = evaluation.score(tree.node(*b));
        sb.total_cmp(&sa).then_with(|| a.cmp(b))
    });
}

/// Pick the leaf whose path becomes the result.
///
/// Terminal nodes are preferred; without any, the nodes at the deepest level
/// reached are the candidates. Returns `None` when only the root exists.
pub(crate) fn optimal_leaf(tree: &ThoughtTree, evaluation: EvaluationStrategy) -> Option<NodeId> {
    let mut candidates: Vec<NodeId> = tree
        .iter()
        .filter(|n| n.is_terminal && !n.is_root())
        .map(|n| n.id)
        .collect();
    if candidates.is_empty() {
        let depth = tree.max_depth();
        if depth == 0 {
            return None;
        }
        candidates = tree.at_depth(depth);
    }
    rank(tree, &mut candidates, evaluation);
    candidates.first().copied()
}
