use tracing::trace;

use super::{crossover::validate_probability, Mutation};
use crate::{
    bounds::Bounds,
    error::{Result, SearchError},
    rng::RandomNumberGenerator,
    DecisionVector,
};

/// Relative perturbation `deltaq` for a variable at normalised distances
/// `delta1` from the lower and `delta2` from the upper bound.
///
/// `rand <= 0.5` moves the value down, anything above moves it up.
pub fn polynomial_deltaq(delta1: f64, delta2: f64, rand: f64, eta: f64) -> f64 {
    let mut_pow = 1.0 / (eta + 1.0);

    if rand <= 0.5 {
        let xy = 1.0 - delta1;
        let val = 2.0 * rand + (1.0 - 2.0 * rand) * xy.powf(eta + 1.0);
        val.powf(mut_pow) - 1.0
    } else {
        let xy = 1.0 - delta2;
        let val = 2.0 * (1.0 - rand) + 2.0 * (rand - 0.5) * xy.powf(eta + 1.0);
        1.0 - val.powf(mut_pow)
    }
}

/// # PolynomialMutation
///
/// Perturbs each variable with probability `prob`, using a polynomial
/// distribution whose shape is set by the distribution index `eta`. When no
/// probability is configured, `1 / num_variables` is used so that on average one
/// variable per individual changes.
///
/// ```rust
/// use evosearch::bounds::Bounds;
/// use evosearch::operators::{Mutation, PolynomialMutation};
/// use evosearch::rng::RandomNumberGenerator;
///
/// let bounds = Bounds::new(vec![0.0; 4], vec![1.0; 4]).unwrap();
/// let mutation = PolynomialMutation::new(20.0).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(8);
///
/// let y = mutation.mutate(&[0.5; 4], &bounds, &mut rng).unwrap();
/// assert_eq!(y.len(), 4);
/// assert!(bounds.contains(&y));
/// ```
#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    eta: f64,
    prob: Option<f64>,
}

impl PolynomialMutation {
    /// # Errors
    ///
    /// Returns a configuration error if `eta` is not a positive finite number.
    pub fn new(eta: f64) -> Result<Self> {
        if !(eta.is_finite() && eta > 0.0) {
            return Err(SearchError::Configuration(format!(
                "Mutation distribution index must be positive, got {}",
                eta
            )));
        }
        Ok(Self { eta, prob: None })
    }

    pub fn with_probability(mut self, prob: f64) -> Result<Self> {
        self.prob = Some(validate_probability(prob, "mutation")?);
        Ok(self)
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Per-variable mutation probability for a problem with `num_variables` variables.
    pub fn probability(&self, num_variables: usize) -> f64 {
        self.prob
            .unwrap_or_else(|| 1.0 / num_variables.max(1) as f64)
    }
}

impl Mutation for PolynomialMutation {
    fn mutate(
        &self,
        x: &[f64],
        bounds: &Bounds,
        rng: &mut RandomNumberGenerator,
    ) -> Result<DecisionVector> {
        bounds.check_dimension(x)?;

        let prob = self.probability(x.len());
        let mut y = x.to_vec();
        let mut mutated = 0usize;

        for (i, value) in y.iter_mut().enumerate() {
            if !rng.bernoulli(prob) {
                continue;
            }

            let (lo, hi) = bounds.get(i);
            let width = hi - lo;
            let delta1 = (*value - lo) / width;
            let delta2 = (hi - *value) / width;

            let deltaq = polynomial_deltaq(delta1, delta2, rng.random(), self.eta);
            *value = bounds.clamp(i, *value + deltaq * width);
            mutated += 1;
        }

        trace!(mutated, num_variables = x.len(), "polynomial mutation applied");
        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltaq_directions() {
        assert!(polynomial_deltaq(0.5, 0.5, 0.1, 1.0) < 0.0);
        assert!(polynomial_deltaq(0.5, 0.5, 0.9, 1.0) > 0.0);
        assert_eq!(polynomial_deltaq(0.5, 0.5, 0.5, 1.0), 0.0);
    }

    #[test]
    fn test_deltaq_reaches_bounds_at_extreme_draws() {
        // rand = 0 with delta1 = 0.3 moves exactly to the lower bound.
        assert!((polynomial_deltaq(0.3, 0.7, 0.0, 1.0) + 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_default_probability() {
        let mutation = PolynomialMutation::new(1.0).unwrap();
        assert!((mutation.probability(4) - 0.25).abs() < 1e-12);
        let fixed = mutation.with_probability(0.7).unwrap();
        assert!((fixed.probability(4) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_zero_probability_passes_through() {
        let bounds = Bounds::new(vec![0.0; 3], vec![1.0; 3]).unwrap();
        let mutation = PolynomialMutation::new(1.0)
            .unwrap()
            .with_probability(0.0)
            .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(0);
        let x = vec![0.1, 0.2, 0.3];
        assert_eq!(mutation.mutate(&x, &bounds, &mut rng).unwrap(), x);
    }

    #[test]
    fn test_values_at_bounds_stay_inside() {
        let bounds = Bounds::new(vec![0.0; 8], vec![1.0; 8]).unwrap();
        let mutation = PolynomialMutation::new(0.5)
            .unwrap()
            .with_probability(1.0)
            .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(99);
        let x = vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        for _ in 0..200 {
            let y = mutation.mutate(&x, &bounds, &mut rng).unwrap();
            assert!(bounds.contains(&y));
        }
    }

    #[test]
    fn test_values_outside_bounds_are_repaired() {
        let bounds = Bounds::new(vec![0.0; 4], vec![1.0; 4]).unwrap();
        let mutation = PolynomialMutation::new(1.5)
            .unwrap()
            .with_probability(1.0)
            .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(17);
        let x = vec![2.0, -1.0, 3.5, f64::NAN];
        for _ in 0..200 {
            let y = mutation.mutate(&x, &bounds, &mut rng).unwrap();
            assert!(bounds.contains(&y), "{:?}", y);
        }
    }

    #[test]
    fn test_rejects_wrong_length() {
        let bounds = Bounds::new(vec![0.0; 3], vec![1.0; 3]).unwrap();
        let mutation = PolynomialMutation::new(1.0).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert!(matches!(
            mutation.mutate(&[0.5, 0.5], &bounds, &mut rng),
            Err(SearchError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }
}
