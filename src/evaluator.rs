use rayon::prelude::*;

use crate::{error::Result, DecisionVector, ObjectiveVector};

/// Maps a decision vector to its objective vector. All objectives are minimised.
///
/// Any `Fn(&[f64]) -> ObjectiveVector` closure is an evaluator:
///
/// ```rust
/// use evosearch::Evaluator;
///
/// let sphere = |x: &[f64]| vec![x.iter().map(|v| v * v).sum::<f64>(), x[0]];
/// assert_eq!(sphere.evaluate(&[1.0, 2.0]).unwrap(), vec![5.0, 1.0]);
/// ```
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, x: &[f64]) -> Result<ObjectiveVector>;

    /// Evaluates a whole population in parallel, preserving row order.
    fn evaluate_all(&self, population: &[DecisionVector]) -> Result<Vec<ObjectiveVector>> {
        population.par_iter().map(|x| self.evaluate(x)).collect()
    }
}

impl<F> Evaluator for F
where
    F: Fn(&[f64]) -> ObjectiveVector + Send + Sync,
{
    fn evaluate(&self, x: &[f64]) -> Result<ObjectiveVector> {
        Ok(self(x))
    }
}
