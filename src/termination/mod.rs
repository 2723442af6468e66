//! The termination module decides, once per generation, whether the search goes on.
//!
//! Two kinds of criteria exist. Hard budgets ([`MaxGeneration`], [`MaxEvaluations`],
//! [`MaxWallTime`]) stop a run unconditionally once exhausted. Adaptive criteria
//! watch the search itself through a [`SlidingWindowTermination`] engine driven by a
//! [`WindowPolicy`] such as [`DesignSpaceDrift`] or [`ParetoConvergence`]. The engine
//! always consults its budgets first, so an exhausted budget wins over any metric.

use std::fmt::Debug;

use crate::state::SearchState;

/// A criterion which tells when the search should stop.
pub trait Termination: Debug + Send {
    /// Returns true if termination condition is met.
    fn is_termination(&mut self, state: &SearchState<'_>) -> bool;

    /// Returns a relative estimation till termination. Value is in the `[0, 1]` range.
    fn estimate(&self, _state: &SearchState<'_>) -> f64 {
        0.
    }
}

mod max_evaluations;
pub use self::max_evaluations::MaxEvaluations;

mod max_generation;
pub use self::max_generation::MaxGeneration;

mod max_time;
pub use self::max_time::{MaxTime, MaxWallTime};

mod window;
pub use self::window::SlidingWindow;

mod sliding;
pub use self::sliding::{
    Decision, Phase, SlidingWindowTermination, StopReason, WindowConfig, WindowPolicy,
};

mod design_drift;
pub use self::design_drift::{DesignSpaceDrift, DriftMode};

mod pareto;
pub use self::pareto::{ParetoConvergence, ParetoDelta};

/// Several criteria combined so that the first one to trigger stops the search.
#[derive(Debug, Default)]
pub struct CompositeTermination {
    terminations: Vec<Box<dyn Termination>>,
}

impl CompositeTermination {
    /// Creates a new instance of `CompositeTermination`.
    pub fn new(terminations: Vec<Box<dyn Termination>>) -> Self {
        Self { terminations }
    }

    /// Combines the optional hard budgets; unset budgets are left out.
    pub fn budgets(
        n_max_gen: Option<usize>,
        n_max_evals: Option<usize>,
        max_time: Option<MaxWallTime>,
    ) -> Self {
        let mut terminations: Vec<Box<dyn Termination>> = Vec::new();
        if let Some(limit) = n_max_gen {
            terminations.push(Box::new(MaxGeneration::new(limit)));
        }
        if let Some(limit) = n_max_evals {
            terminations.push(Box::new(MaxEvaluations::new(limit)));
        }
        if let Some(wall_time) = max_time {
            terminations.push(Box::new(wall_time));
        }
        Self { terminations }
    }

    pub fn push(&mut self, termination: Box<dyn Termination>) {
        self.terminations.push(termination);
    }

    pub fn len(&self) -> usize {
        self.terminations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminations.is_empty()
    }
}

impl Termination for CompositeTermination {
    fn is_termination(&mut self, state: &SearchState<'_>) -> bool {
        self.terminations.iter_mut().any(|t| t.is_termination(state))
    }

    fn estimate(&self, state: &SearchState<'_>) -> f64 {
        self.terminations
            .iter()
            .map(|t| t.estimate(state))
            .fold(0., f64::max)
    }
}
