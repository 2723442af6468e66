//! # Simulated binary crossover
//!
//! SBX recombines two real-valued parents so that the spread of the offspring
//! around the parents mimics single-point crossover on binary strings. The
//! distribution index `eta` controls that spread: large values keep children close
//! to their parents, values near zero push them towards the bounds.
//!
//! The per-variable arithmetic is exposed as [`sbx_children`] and [`calc_betaq`]
//! so the exact numbers for a known random draw can be checked by hand.

use tracing::trace;

use super::Crossover;
use crate::{
    bounds::Bounds,
    error::{Result, SearchError},
    rng::RandomNumberGenerator,
    DecisionVector,
};

/// Parents closer than this on a variable are treated as identical there.
pub const IDENTICAL_PARENTS_EPS: f64 = 1.0e-14;

/// Lower floor of the parent distance used as a divisor.
pub const MIN_PARENT_DISTANCE: f64 = 1.0e-10;

/// Spread factor `betaq` for a given `beta`, uniform draw `rand` and index `eta`.
pub fn calc_betaq(beta: f64, rand: f64, eta: f64) -> f64 {
    let alpha = 2.0 - beta.powf(-(eta + 1.0));
    let exponent = 1.0 / (eta + 1.0);

    if rand <= 1.0 / alpha {
        (rand * alpha).powf(exponent)
    } else {
        (1.0 / (2.0 - rand * alpha)).powf(exponent)
    }
}

/// Computes both children for one variable, before the random swap and repair.
///
/// `y1 <= y2` are the sorted parent values and `(lo, hi)` the variable's bounds.
/// Child 1 is spread towards the lower bound, child 2 towards the upper bound.
pub fn sbx_children(y1: f64, y2: f64, lo: f64, hi: f64, eta: f64, rand: f64) -> (f64, f64) {
    let delta = (y2 - y1).max(MIN_PARENT_DISTANCE);

    let beta = 1.0 + (2.0 * (y1 - lo) / delta);
    let betaq = calc_betaq(beta, rand, eta);
    let c1 = 0.5 * ((y1 + y2) - betaq * delta);

    let beta = 1.0 + (2.0 * (hi - y2) / delta);
    let betaq = calc_betaq(beta, rand, eta);
    let c2 = 0.5 * ((y1 + y2) + betaq * delta);

    (c1, c2)
}

/// # SimulatedBinaryCrossover
///
/// Pairwise recombination respecting [`Bounds`].
///
/// Two probabilities apply. `probability` decides whether a mating recombines at
/// all; a mating that does not recombine yields parent copies. Within a mating,
/// `prob_per_variable` decides independently for each variable whether it is
/// recombined or copied.
///
/// ```rust
/// use evosearch::bounds::Bounds;
/// use evosearch::operators::{Crossover, SimulatedBinaryCrossover};
/// use evosearch::rng::RandomNumberGenerator;
///
/// let bounds = Bounds::new(vec![0.0, 0.0], vec![10.0, 10.0]).unwrap();
/// let sbx = SimulatedBinaryCrossover::new(15.0).unwrap();
/// let mut rng = RandomNumberGenerator::from_seed(5);
///
/// let children = sbx.crossover(&[1.0, 1.0], &[9.0, 9.0], &bounds, &mut rng).unwrap();
/// assert_eq!(children.len(), 2);
/// assert!(children.iter().all(|c| bounds.contains(c)));
/// ```
#[derive(Debug, Clone)]
pub struct SimulatedBinaryCrossover {
    eta: f64,
    prob_per_variable: f64,
    probability: f64,
    n_offsprings: usize,
}

impl SimulatedBinaryCrossover {
    /// Creates SBX with distribution index `eta`, a per-variable probability of
    /// 0.5, every mating recombined and two offspring per mating.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `eta` is not a positive finite number.
    pub fn new(eta: f64) -> Result<Self> {
        if !(eta.is_finite() && eta > 0.0) {
            return Err(SearchError::Configuration(format!(
                "Crossover distribution index must be positive, got {}",
                eta
            )));
        }

        Ok(Self {
            eta,
            prob_per_variable: 0.5,
            probability: 1.0,
            n_offsprings: 2,
        })
    }

    pub fn with_prob_per_variable(mut self, prob: f64) -> Result<Self> {
        self.prob_per_variable = validate_probability(prob, "per-variable crossover")?;
        Ok(self)
    }

    pub fn with_probability(mut self, prob: f64) -> Result<Self> {
        self.probability = validate_probability(prob, "crossover")?;
        Ok(self)
    }

    pub fn with_n_offsprings(mut self, n_offsprings: usize) -> Result<Self> {
        if !(1..=2).contains(&n_offsprings) {
            return Err(SearchError::Configuration(format!(
                "SBX produces one or two offspring per mating, got {}",
                n_offsprings
            )));
        }
        self.n_offsprings = n_offsprings;
        Ok(self)
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn prob_per_variable(&self) -> f64 {
        self.prob_per_variable
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    fn recombine(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        bounds: &Bounds,
        rng: &mut RandomNumberGenerator,
    ) -> (DecisionVector, DecisionVector) {
        let mut child1 = parent1.to_vec();
        let mut child2 = parent2.to_vec();

        for i in 0..parent1.len() {
            let (x1, x2) = (parent1[i], parent2[i]);
            let do_crossover = rng.bernoulli(self.prob_per_variable);

            if !do_crossover || (x1 - x2).abs() <= IDENTICAL_PARENTS_EPS {
                continue;
            }

            let (lo, hi) = bounds.get(i);
            let rand = rng.random();
            let (mut c1, mut c2) = sbx_children(x1.min(x2), x1.max(x2), lo, hi, self.eta, rand);

            if rng.random() <= 0.5 {
                std::mem::swap(&mut c1, &mut c2);
            }

            child1[i] = c1;
            child2[i] = c2;
        }

        bounds.repair(&mut child1);
        bounds.repair(&mut child2);

        (child1, child2)
    }
}

impl Crossover for SimulatedBinaryCrossover {
    fn n_offsprings(&self) -> usize {
        self.n_offsprings
    }

    fn crossover(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        bounds: &Bounds,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<DecisionVector>> {
        if parent1.len() != parent2.len() {
            return Err(SearchError::DimensionMismatch {
                expected: parent1.len(),
                actual: parent2.len(),
            });
        }
        bounds.check_dimension(parent1)?;

        let (child1, child2) = if rng.bernoulli(self.probability) {
            self.recombine(parent1, parent2, bounds, rng)
        } else {
            trace!("mating skipped, copying parents");
            let (mut child1, mut child2) = (parent1.to_vec(), parent2.to_vec());
            bounds.repair(&mut child1);
            bounds.repair(&mut child2);
            (child1, child2)
        };

        if self.n_offsprings == 1 {
            let child = child1
                .iter()
                .zip(child2.iter())
                .map(|(&a, &b)| if rng.index(2) == 0 { a } else { b })
                .collect();
            return Ok(vec![child]);
        }

        Ok(vec![child1, child2])
    }
}

pub(crate) fn validate_probability(prob: f64, what: &str) -> Result<f64> {
    if !(0.0..=1.0).contains(&prob) {
        return Err(SearchError::Configuration(format!(
            "The {} probability must lie in [0, 1], got {}",
            what, prob
        )));
    }
    Ok(prob)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Bounds {
        Bounds::new(vec![0.0, 0.0], vec![10.0, 10.0]).unwrap()
    }

    #[test]
    fn test_hand_computed_children() {
        // y1 = 1, y2 = 9, delta = 8, beta = 1.25, alpha = 1.36, betaq = sqrt(0.68)
        let betaq = 0.68f64.sqrt();
        assert!((calc_betaq(1.25, 0.5, 1.0) - betaq).abs() < 1e-12);

        let (c1, c2) = sbx_children(1.0, 9.0, 0.0, 10.0, 1.0, 0.5);
        assert!((c1 - 0.5 * (10.0 - betaq * 8.0)).abs() < 1e-12);
        assert!((c2 - 0.5 * (10.0 + betaq * 8.0)).abs() < 1e-12);
        assert!((c1 - 1.701515).abs() < 1e-6);
        assert!((c2 - 8.298485).abs() < 1e-6);
    }

    #[test]
    fn test_betaq_upper_branch() {
        // alpha = 1.36, 1 / alpha ~ 0.735, so rand = 0.9 takes the second branch.
        let expected = (1.0 / (2.0 - 0.9 * 1.36f64)).sqrt();
        assert!((calc_betaq(1.25, 0.9, 1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_distance_uses_floor() {
        let (c1, c2) = sbx_children(5.0, 5.0, 0.0, 10.0, 1.0, 0.3);
        assert!(c1.is_finite() && c2.is_finite());
        assert!((c1 - 5.0).abs() < 1e-8);
        assert!((c2 - 5.0).abs() < 1e-8);
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(SimulatedBinaryCrossover::new(0.0).is_err());
        assert!(SimulatedBinaryCrossover::new(f64::NAN).is_err());
        let sbx = SimulatedBinaryCrossover::new(1.0).unwrap();
        assert!(sbx.clone().with_prob_per_variable(1.5).is_err());
        assert!(sbx.clone().with_probability(-0.1).is_err());
        assert!(sbx.with_n_offsprings(3).is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        let sbx = SimulatedBinaryCrossover::new(1.0).unwrap();
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert!(matches!(
            sbx.crossover(&[1.0, 2.0], &[1.0], &square(), &mut rng),
            Err(SearchError::DimensionMismatch { .. })
        ));
        assert!(sbx
            .crossover(&[1.0], &[2.0], &square(), &mut rng)
            .is_err());
    }

    #[test]
    fn test_single_offspring_mixes_per_variable() {
        let bounds = Bounds::new(vec![0.0; 64], vec![10.0; 64]).unwrap();
        let sbx = SimulatedBinaryCrossover::new(1.0)
            .unwrap()
            .with_prob_per_variable(0.0)
            .unwrap()
            .with_n_offsprings(1)
            .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(21);

        let p1 = vec![1.0; 64];
        let p2 = vec![9.0; 64];
        let children = sbx.crossover(&p1, &p2, &bounds, &mut rng).unwrap();

        assert_eq!(children.len(), 1);
        let child = &children[0];
        assert!(child.iter().all(|&v| v == 1.0 || v == 9.0));
        assert!(child.iter().any(|&v| v == 1.0));
        assert!(child.iter().any(|&v| v == 9.0));
    }

    #[test]
    fn test_skipped_mating_copies_parents() {
        let sbx = SimulatedBinaryCrossover::new(1.0)
            .unwrap()
            .with_probability(0.0)
            .unwrap()
            .with_prob_per_variable(1.0)
            .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let children = sbx
            .crossover(&[1.0, 2.0], &[8.0, 7.0], &square(), &mut rng)
            .unwrap();
        assert_eq!(children, vec![vec![1.0, 2.0], vec![8.0, 7.0]]);
    }

    #[test]
    fn test_parents_outside_bounds_are_repaired() {
        let recombining = SimulatedBinaryCrossover::new(1.5)
            .unwrap()
            .with_prob_per_variable(1.0)
            .unwrap();
        let copying = SimulatedBinaryCrossover::new(1.5)
            .unwrap()
            .with_probability(0.0)
            .unwrap();
        let mut rng = RandomNumberGenerator::from_seed(13);

        for sbx in [recombining, copying] {
            for _ in 0..100 {
                let children = sbx
                    .crossover(&[-4.0, 12.0], &[3.0, f64::NAN], &square(), &mut rng)
                    .unwrap();
                assert!(children.iter().all(|c| square().contains(c)), "{:?}", children);
            }
        }
    }
}
