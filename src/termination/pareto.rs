use tracing::{instrument, trace};

use super::*;
use crate::error::{Result, SearchError};
use crate::indicators::{hypervolume, igd_plus, normalize};
use crate::ObjectiveVector;

/// Change between two consecutive non-dominated sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParetoDelta {
    /// IGD+ of the current set measured against the previous one.
    pub igd_plus: f64,
    /// Absolute hypervolume difference of the two sets.
    pub hypervolume: f64,
    /// `igd_plus + hypervolume`.
    pub delta: f64,
}

/// Watches how much the non-dominated front still changes.
///
/// Both sets are min–max normalised on their own before comparison, so the
/// metric reacts to changes in the shape of the front rather than its scale.
/// The search continues while the largest delta in the metric window exceeds
/// `epsilon`.
#[derive(Debug, Clone)]
pub struct ParetoConvergence {
    epsilon: f64,
    reference_point: Vec<f64>,
}

impl ParetoConvergence {
    pub const DEFAULT_EPSILON: f64 = 0.0025;

    /// Creates the policy with the reference point `(1, 1)`.
    pub fn new(epsilon: f64) -> Result<Self> {
        Self::with_reference_point(epsilon, vec![1.0, 1.0])
    }

    /// # Errors
    ///
    /// `epsilon` must be a non-negative number and the reference point must have
    /// at least one finite coordinate per objective.
    pub fn with_reference_point(epsilon: f64, reference_point: Vec<f64>) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(SearchError::Configuration(format!(
                "The convergence epsilon must be a non-negative number, got {}",
                epsilon
            )));
        }
        if reference_point.is_empty() || reference_point.iter().any(|v| !v.is_finite()) {
            return Err(SearchError::Configuration(format!(
                "Invalid hypervolume reference point {:?}",
                reference_point
            )));
        }
        Ok(Self {
            epsilon,
            reference_point,
        })
    }

    /// Builds a ready engine with one metric per decision, matching the usual
    /// front-convergence setup.
    #[instrument(level = "debug", skip(budgets))]
    pub fn termination(
        epsilon: f64,
        budgets: CompositeTermination,
    ) -> Result<SlidingWindowTermination<Self>> {
        Ok(SlidingWindowTermination::new(Self::new(epsilon)?, WindowConfig::default())?
            .with_budgets(budgets))
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn reference_point(&self) -> &[f64] {
        &self.reference_point
    }

    /// Compares two non-dominated sets. Returns `None` if either is empty.
    pub fn compare(
        &self,
        previous: &[ObjectiveVector],
        current: &[ObjectiveVector],
    ) -> Option<ParetoDelta> {
        let previous = normalize(previous);
        let current = normalize(current);

        let igd_plus = igd_plus(&previous, &current)?;
        let hypervolume = (hypervolume(&current, &self.reference_point)
            - hypervolume(&previous, &self.reference_point))
        .abs();

        trace!(igd_plus, hypervolume, "front change measured");
        Some(ParetoDelta {
            igd_plus,
            hypervolume,
            delta: igd_plus + hypervolume,
        })
    }
}

impl WindowPolicy for ParetoConvergence {
    type Data = Vec<ObjectiveVector>;
    type Metric = ParetoDelta;

    fn store(&self, state: &SearchState<'_>) -> Option<Self::Data> {
        (!state.non_dominated.is_empty()).then(|| state.non_dominated.to_vec())
    }

    fn metric(&self, data: &[&Self::Data]) -> Option<ParetoDelta> {
        let [.., previous, current] = data else {
            return None;
        };
        self.compare(previous, current)
    }

    fn decide(&self, metrics: &[&ParetoDelta]) -> bool {
        metrics
            .iter()
            .map(|m| m.delta)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .map_or(true, |largest| largest > self.epsilon)
    }

    fn metric_value(&self, metric: &ParetoDelta) -> f64 {
        metric.delta
    }
}
