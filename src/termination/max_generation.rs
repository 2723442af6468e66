use tracing::info;

use super::*;

/// A termination criteria which is in terminated state when maximum amount of generations is
/// reached.
#[derive(Debug, Clone)]
pub struct MaxGeneration {
    limit: usize,
}

impl MaxGeneration {
    /// Creates a new instance of `MaxGeneration`.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Termination for MaxGeneration {
    fn is_termination(&mut self, state: &SearchState<'_>) -> bool {
        let exhausted = state.generation >= self.limit;
        if exhausted {
            info!(generation = state.generation, limit = self.limit, "generation budget exhausted");
        }
        exhausted
    }

    fn estimate(&self, state: &SearchState<'_>) -> f64 {
        if self.limit == 0 {
            return 1.;
        }
        (state.generation as f64 / self.limit as f64).min(1.)
    }
}
