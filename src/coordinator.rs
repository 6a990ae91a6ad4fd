//! Strategy coordinator.
//!
//! [`ReasoningCoordinator::reason`] is the engine's single entry point. It
//! picks a strategy (pinned by the caller or matched against the problem's
//! classification through strategy capabilities), applies per-call
//! overrides, and races the run against cancellation and a deadline.
//!
//! A cancelled or timed-out call drops the strategy future, which abandons
//! in-flight oracle calls and discards the partially built tree or step
//! history. No partial result is returned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ConfigError, EngineError};
use crate::model::{ReasoningResult, StrategyKind};
use crate::strategies::{
    Capability, ChainConfig, ChainOfThoughtStrategy, DirectStrategy, ReasoningStrategy,
    TreeConfig, TreeOfThoughtsStrategy,
};
use crate::traits::{Oracle, ProblemClassifier};
use crate::validation::RuleRegistry;

/// Strategies tried, in order, when dispatching on classification.
const DISPATCH_ORDER: [StrategyKind; 3] = [
    StrategyKind::ChainOfThought,
    StrategyKind::TreeOfThoughts,
    StrategyKind::Direct,
];

/// Per-call overrides of the coordinator's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReasoningOptions {
    /// Strategy to use instead of classifier-based dispatch.
    pub strategy: Option<StrategyKind>,
    /// Chain-of-Thought parameters for this call.
    pub chain: Option<ChainConfig>,
    /// Tree-of-Thoughts parameters for this call.
    pub tree: Option<TreeConfig>,
    /// Deadline for this call; overrides the configured timeout.
    pub timeout: Option<Duration>,
}

impl ReasoningOptions {
    /// Options with no overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Override Chain-of-Thought parameters.
    #[must_use]
    pub const fn with_chain(mut self, chain: ChainConfig) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Override Tree-of-Thoughts parameters.
    #[must_use]
    pub const fn with_tree(mut self, tree: TreeConfig) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Set a deadline for the call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Dispatches problems to reasoning strategies.
///
/// Holds no per-call state: concurrent `reason` calls share the oracle,
/// the classifier and the read-only rule registry, and nothing else.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use reasoning_engine::classifier::KeywordClassifier;
/// use reasoning_engine::config::Config;
/// use reasoning_engine::coordinator::{ReasoningCoordinator, ReasoningOptions};
/// # use reasoning_engine::traits::Oracle;
/// # async fn run<O: Oracle + 'static>(oracle: O) -> Result<(), reasoning_engine::error::EngineError> {
///
/// let coordinator = ReasoningCoordinator::new(
///     Arc::new(oracle),
///     Arc::new(KeywordClassifier::new()),
///     Config::default(),
/// );
/// let result = coordinator
///     .reason("What is 15 + 27?", ReasoningOptions::new())
///     .await?;
/// println!("{:?}", result.final_answer);
/// # Ok(())
/// # }
/// ```
pub struct ReasoningCoordinator<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    oracle: Arc<O>,
    classifier: Arc<P>,
    registry: Arc<RuleRegistry>,
    config: Config,
}

impl<O, P> ReasoningCoordinator<O, P>
where
    O: Oracle + 'static,
    P: ProblemClassifier + 'static,
{
    /// Create a coordinator with the built-in rules configured by
    /// `config.validation`.
    #[must_use]
    pub fn new(oracle: Arc<O>, classifier: Arc<P>, config: Config) -> Self {
        let registry = RuleRegistry::builder()
            .with_builtin_rules(&config.validation)
            .build();
        Self {
            oracle,
            classifier,
            registry: Arc::new(registry),
            config,
        }
    }

    /// Replace the rule registry, e.g. to add domain plugins.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Rule registry shared by every call.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Reason about `problem`.
    ///
    /// # Errors
    ///
    /// See [`reason_with_cancel`](Self::reason_with_cancel).
    pub async fn reason(
        &self,
        problem: &str,
        options: ReasoningOptions,
    ) -> Result<ReasoningResult, EngineError> {
        self.reason_with_cancel(problem, options, CancellationToken::new())
            .await
    }

    /// Reason about `problem`, stopping early when `cancel` fires.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidConfig`] if an override is out of range
    /// - [`EngineError::InvalidInput`] if the problem fails input validation
    /// - [`EngineError::Cancelled`] if `cancel` fires first
    /// - [`EngineError::TimedOut`] if the deadline passes first
    pub async fn reason_with_cancel(
        &self,
        problem: &str,
        options: ReasoningOptions,
        cancel: CancellationToken,
    ) -> Result<ReasoningResult, EngineError> {
        let strategy = self.select(problem, &options)?;
        let deadline = options.timeout.or_else(|| self.config.reasoning_timeout());
        let started = Instant::now();

        info!(
            strategy = strategy.kind().as_str(),
            timeout = ?deadline,
            "Reasoning started"
        );

        let run = async {
            match deadline {
                Some(limit) => match tokio::time::timeout(limit, strategy.reason(problem)).await {
                    Ok(result) => result,
                    Err(_) => Err(EngineError::TimedOut {
                        elapsed_ms: elapsed_ms(started),
                    }),
                },
                None => strategy.reason(problem).await,
            }
        };

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(EngineError::Cancelled),
            result = run => result,
        };

        match &outcome {
            Ok(result) => info!(
                strategy = result.strategy.as_str(),
                status = result.status.as_str(),
                steps = result.steps.len(),
                confidence = result.confidence,
                elapsed_ms = elapsed_ms(started),
                "Reasoning finished"
            ),
            Err(e) if e.is_cancellation() => {
                warn!(error = %e, elapsed_ms = elapsed_ms(started), "Reasoning abandoned");
            }
            Err(e) => debug!(error = %e, "Reasoning rejected"),
        }
        outcome
    }

    /// Build the strategy of the given kind with this call's parameters.
    fn build(
        &self,
        kind: StrategyKind,
        options: &ReasoningOptions,
    ) -> Box<dyn ReasoningStrategy> {
        let oracle = Arc::clone(&self.oracle);
        let classifier = Arc::clone(&self.classifier);
        let registry = Arc::clone(&self.registry);
        let retries = self.config.oracle_max_retries;
        match kind {
            StrategyKind::ChainOfThought => Box::new(
                ChainOfThoughtStrategy::new(oracle, classifier, registry, self.chain(options))
                    .with_max_retries(retries),
            ),
            StrategyKind::TreeOfThoughts => Box::new(
                TreeOfThoughtsStrategy::new(oracle, classifier, registry, self.tree(options))
                    .with_max_retries(retries),
            ),
            StrategyKind::Direct => Box::new(
                DirectStrategy::new(oracle, classifier, registry).with_max_retries(retries),
            ),
        }
    }

    fn chain(&self, options: &ReasoningOptions) -> ChainConfig {
        options.chain.unwrap_or(self.config.chain)
    }

    fn tree(&self, options: &ReasoningOptions) -> TreeConfig {
        options.tree.unwrap_or(self.config.tree)
    }

    /// Pick the strategy for this call and check only its parameters.
    fn select(
        &self,
        problem: &str,
        options: &ReasoningOptions,
    ) -> Result<Box<dyn ReasoningStrategy>, EngineError> {
        let strategy = if let Some(kind) = options.strategy {
            debug!(strategy = kind.as_str(), "Strategy pinned by caller");
            self.build(kind, options)
        } else {
            let classification = self.classifier.classify(problem);
            let needed = Capability::for_hint(classification.hint);
            debug!(
                problem_type = classification.problem_type.as_str(),
                capability = ?needed,
                "Dispatching on classification"
            );
            DISPATCH_ORDER
                .into_iter()
                .map(|kind| self.build(kind, options))
                .find(|s| s.capabilities().contains(&needed))
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: "strategy".into(),
                    reason: "no strategy matches the request".into(),
                })?
        };

        match strategy.kind() {
            StrategyKind::ChainOfThought => self.chain(options).validate()?,
            StrategyKind::TreeOfThoughts => self.tree(options).validate()?,
            StrategyKind::Direct => {}
        }
        Ok(strategy)
    }
}

impl<O, P> std::fmt::Debug for ReasoningCoordinator<O, P>
where
    O: Oracle,
    P: ProblemClassifier,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningCoordinator")
            .field("oracle", &"<Oracle>")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
