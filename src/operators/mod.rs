//! # Variation operators
//!
//! The traits in this module are the seams between the search core and an external
//! evolutionary driver. The driver samples generation 0 once, then for every later
//! generation recombines selected parents and mutates the offspring. Every call
//! receives the run's [`RandomNumberGenerator`] explicitly, and every produced
//! vector is repaired into [`Bounds`] before it is returned.
pub mod crossover;
pub mod duplicate;
pub mod mutation;
pub mod sampling;
pub mod variation;

use std::fmt::Debug;

use crate::{bounds::Bounds, error::Result, rng::RandomNumberGenerator, DecisionVector};

/// Produces the initial population.
pub trait Sampling
where
    Self: Debug + Clone + Send + Sync,
{
    /// Draws `n_samples` decision vectors inside `bounds`.
    fn sample(
        &self,
        bounds: &Bounds,
        n_samples: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Vec<DecisionVector>;
}

/// Recombines two parents into offspring.
pub trait Crossover
where
    Self: Debug + Clone + Send + Sync,
{
    /// Number of offspring produced per mating, either 1 or 2.
    fn n_offsprings(&self) -> usize;

    /// Recombines `parent1` and `parent2`.
    ///
    /// ## Errors
    ///
    /// Fails when the parents differ in length or do not match `bounds`.
    fn crossover(
        &self,
        parent1: &[f64],
        parent2: &[f64],
        bounds: &Bounds,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<DecisionVector>>;
}

/// Perturbs a single individual.
pub trait Mutation
where
    Self: Debug + Clone + Send + Sync,
{
    /// Returns a mutated copy of `x`. The input is never modified.
    ///
    /// ## Errors
    ///
    /// Fails when `x` does not match `bounds`.
    fn mutate(
        &self,
        x: &[f64],
        bounds: &Bounds,
        rng: &mut RandomNumberGenerator,
    ) -> Result<DecisionVector>;
}

pub use crossover::SimulatedBinaryCrossover;
pub use duplicate::{DuplicateElimination, KeepDuplicates};
pub use mutation::PolynomialMutation;
pub use sampling::BoundedSampler;
pub use variation::Variation;
