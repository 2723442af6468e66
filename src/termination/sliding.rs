use tracing::{debug, info};

use super::*;
use crate::error::{Result, SearchError};

/// Pluggable behaviour of a [`SlidingWindowTermination`].
///
/// A policy says what to remember from each generation, how to summarise a few
/// remembered snapshots into a metric and how to judge a full window of metrics.
pub trait WindowPolicy: Debug + Send {
    /// Snapshot kept in the data window.
    type Data: Debug + Send;
    /// Summary kept in the metric window.
    type Metric: Debug + Clone + Send;

    /// Extracts a snapshot from the current generation. `None` records nothing.
    fn store(&self, state: &SearchState<'_>) -> Option<Self::Data>;

    /// Summarises the most recent snapshots, oldest first. `None` records nothing.
    fn metric(&self, data: &[&Self::Data]) -> Option<Self::Metric>;

    /// Judges a full metric window, oldest first. Returns true while the search
    /// is still moving by more than the tolerance, i.e. when it should continue.
    fn decide(&self, metrics: &[&Self::Metric]) -> bool;

    /// Scalar view of a metric for progress reporting.
    fn metric_value(&self, metric: &Self::Metric) -> f64;
}

/// Why a search was told to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A hard budget (generations, evaluations or wall time) ran out.
    BudgetExhausted,
    /// The policy judged the metric window as no longer changing.
    Converged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Stop(StopReason),
}

impl Decision {
    pub fn should_continue(&self) -> bool {
        matches!(self, Decision::Continue)
    }
}

/// Where the engine ended up during the last check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fewer than `min_data_for_metric` snapshots are stored.
    AwaitingData,
    /// Metrics are being computed but the metric window is not full yet.
    AwaitingMetricWindow,
    /// The metric window is full but this is not a checking generation.
    AwaitingCheck,
    /// A decision was reached by a budget or by the policy.
    Done(Decision),
}

/// Sizes and cadence of a [`SlidingWindowTermination`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    /// Number of metrics judged together, and the metric window's capacity.
    pub metric_window_size: usize,
    /// Number of snapshots a metric is computed from, and the data window's capacity.
    pub data_window_size: usize,
    /// Snapshots required before the first metric is computed.
    pub min_data_for_metric: usize,
    /// The policy is consulted only on generations divisible by this value.
    pub nth_gen: usize,
}

impl WindowConfig {
    pub fn new(metric_window_size: usize) -> Self {
        Self {
            metric_window_size,
            ..Self::default()
        }
    }

    pub fn with_data_window_size(mut self, size: usize) -> Self {
        self.data_window_size = size;
        self
    }

    pub fn with_min_data_for_metric(mut self, min: usize) -> Self {
        self.min_data_for_metric = min;
        self
    }

    pub fn with_nth_gen(mut self, nth_gen: usize) -> Self {
        self.nth_gen = nth_gen;
        self
    }

    /// # Errors
    ///
    /// Sizes and cadence must be at least one, and the data window must be able
    /// to hold `min_data_for_metric` snapshots.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("metric_window_size", self.metric_window_size),
            ("data_window_size", self.data_window_size),
            ("min_data_for_metric", self.min_data_for_metric),
            ("nth_gen", self.nth_gen),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(SearchError::Configuration(format!("{} must be at least 1", name)));
        }

        if self.min_data_for_metric > self.data_window_size {
            return Err(SearchError::Configuration(format!(
                "min_data_for_metric ({}) cannot exceed data_window_size ({})",
                self.min_data_for_metric, self.data_window_size
            )));
        }

        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            metric_window_size: 1,
            data_window_size: 2,
            min_data_for_metric: 2,
            nth_gen: 1,
        }
    }
}

/// # SlidingWindowTermination
///
/// A generic convergence engine with two bounded histories: a data window of raw
/// per-generation snapshots and a metric window of summaries derived from them.
///
/// Every check runs the same steps:
///
/// 1. An exhausted hard budget stops the search immediately.
/// 2. The policy's snapshot of the generation is pushed into the data window.
/// 3. With enough snapshots, a metric over the most recent `data_window_size`
///    snapshots is pushed into the metric window.
/// 4. On every `nth_gen`-th generation with a full metric window, the policy
///    decides; `true` continues the search and `false` stops it.
/// 5. Anything else continues.
///
/// The engine is mutated by one caller per generation and must not be shared
/// between independent searches.
#[derive(Debug)]
pub struct SlidingWindowTermination<P: WindowPolicy> {
    policy: P,
    config: WindowConfig,
    budgets: CompositeTermination,
    data: SlidingWindow<P::Data>,
    metrics: SlidingWindow<P::Metric>,
    phase: Phase,
}

impl<P: WindowPolicy> SlidingWindowTermination<P> {
    /// # Errors
    ///
    /// Returns a configuration error when `config` does not validate.
    pub fn new(policy: P, config: WindowConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            data: SlidingWindow::new(config.data_window_size),
            metrics: SlidingWindow::new(config.metric_window_size),
            policy,
            config,
            budgets: CompositeTermination::default(),
            phase: Phase::AwaitingData,
        })
    }

    /// Replaces the hard budgets consulted before any adaptive logic.
    pub fn with_budgets(mut self, budgets: CompositeTermination) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn data(&self) -> &SlidingWindow<P::Data> {
        &self.data
    }

    pub fn metrics(&self) -> &SlidingWindow<P::Metric> {
        &self.metrics
    }

    /// The most recently computed metric, if any.
    pub fn last_metric(&self) -> Option<&P::Metric> {
        self.metrics.last()
    }

    pub fn last_metric_value(&self) -> Option<f64> {
        self.metrics.last().map(|m| self.policy.metric_value(m))
    }

    /// Runs one check for the generation described by `state`.
    pub fn check(&mut self, state: &SearchState<'_>) -> Decision {
        self.phase = self.advance(state);
        debug!(generation = state.generation, phase = ?self.phase, "termination checked");

        match self.phase {
            Phase::Done(decision) => decision,
            _ => Decision::Continue,
        }
    }

    fn advance(&mut self, state: &SearchState<'_>) -> Phase {
        if self.budgets.is_termination(state) {
            return Phase::Done(Decision::Stop(StopReason::BudgetExhausted));
        }

        if let Some(snapshot) = self.policy.store(state) {
            self.data.push(snapshot);
        }

        if self.data.len() < self.config.min_data_for_metric {
            return Phase::AwaitingData;
        }

        let recent = self.data.recent(self.config.data_window_size);
        if let Some(metric) = self.policy.metric(&recent) {
            self.metrics.push(metric);
        }

        if self.metrics.len() < self.config.metric_window_size {
            return Phase::AwaitingMetricWindow;
        }

        if state.generation % self.config.nth_gen != 0 {
            return Phase::AwaitingCheck;
        }

        let window = self.metrics.recent(self.config.metric_window_size);
        if self.policy.decide(&window) {
            Phase::Done(Decision::Continue)
        } else {
            info!(
                generation = state.generation,
                metric = ?self.last_metric_value(),
                "search converged"
            );
            Phase::Done(Decision::Stop(StopReason::Converged))
        }
    }
}

impl<P: WindowPolicy> Termination for SlidingWindowTermination<P> {
    fn is_termination(&mut self, state: &SearchState<'_>) -> bool {
        !self.check(state).should_continue()
    }

    fn estimate(&self, state: &SearchState<'_>) -> f64 {
        self.budgets.estimate(state)
    }
}
