//! Reasoning Engine
//!
//! Structured multi-step reasoning over a pluggable oracle.
//!
//! # Features
//!
//! - Iterative Chain-of-Thought with confidence-driven refinement
//! - Tree-of-Thoughts search (BFS, DFS, beam, A*)
//! - Single-shot direct answers
//! - Rule-based validation of inputs, steps and results, with plugins
//! - Anthropic Messages API oracle
//!
//! # Quick Start
//!
//! ```bash
//! ANTHROPIC_API_KEY=sk-ant-xxx ./reasoning-engine "What is 15 + 27?"
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   reason()   ┌──────────────┐   propose/evaluate   ┌────────┐
//! │   Caller    │─────────────▶│ Coordinator  │─────────────────────▶│ Oracle │
//! │             │◀─────────────│  (strategy)  │◀─────────────────────│        │
//! └─────────────┘   result     └──────┬───────┘                      └────────┘
//!                                     │
//!                                     ▼
//!                              Rule registry
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod anthropic;
pub mod classifier;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod strategies;
pub mod traits;
pub mod validation;

pub use coordinator::{ReasoningCoordinator, ReasoningOptions};
pub use error::{EngineError, OracleError};
pub use model::{ReasoningResult, ReasoningStep, ResultStatus, StepStatus, StrategyKind};
