use std::time::{Duration, Instant};

use crate::{DecisionVector, ObjectiveVector};

/// What the driver knows about the search at a termination check.
///
/// A fresh snapshot is built every generation after objective evaluation and
/// survival have finished; the termination engine only reads it.
#[derive(Debug, Clone, Copy)]
pub struct SearchState<'a> {
    /// Number of completed generations, starting at 1 once the initial
    /// population has been evaluated.
    pub generation: usize,
    /// Total number of objective evaluations so far.
    pub evaluations: usize,
    /// When the driver started the run.
    pub started_at: Instant,
    /// Decision vectors of the current population.
    pub population: &'a [DecisionVector],
    /// Objective vectors of the current non-dominated set.
    pub non_dominated: &'a [ObjectiveVector],
}

impl<'a> SearchState<'a> {
    pub fn new(generation: usize, evaluations: usize, started_at: Instant) -> Self {
        Self {
            generation,
            evaluations,
            started_at,
            population: &[],
            non_dominated: &[],
        }
    }

    pub fn with_population(mut self, population: &'a [DecisionVector]) -> Self {
        self.population = population;
        self
    }

    pub fn with_non_dominated(mut self, non_dominated: &'a [ObjectiveVector]) -> Self {
        self.non_dominated = non_dominated;
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
