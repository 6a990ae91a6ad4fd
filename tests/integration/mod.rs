//! End-to-end workflows through [`ReasoningCoordinator`](reasoning_engine::ReasoningCoordinator).

mod cancellation;
mod chain_workflow;
mod determinism;
mod tree_workflow;
