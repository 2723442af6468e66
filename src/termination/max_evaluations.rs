use tracing::info;

use super::*;

/// A termination criteria which is in terminated state once the objective
/// evaluator has been called `limit` times.
///
/// Evaluations are counted per generation, so with a population of 100 and a
/// limit of 150 the run stops after the second generation has been evaluated.
#[derive(Debug, Clone)]
pub struct MaxEvaluations {
    limit: usize,
}

impl MaxEvaluations {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Termination for MaxEvaluations {
    fn is_termination(&mut self, state: &SearchState<'_>) -> bool {
        let exhausted = state.evaluations >= self.limit;
        if exhausted {
            info!(
                evaluations = state.evaluations,
                limit = self.limit,
                "evaluation budget exhausted"
            );
        }
        exhausted
    }

    fn estimate(&self, state: &SearchState<'_>) -> f64 {
        if self.limit == 0 {
            return 1.;
        }
        (state.evaluations as f64 / self.limit as f64).min(1.)
    }
}
