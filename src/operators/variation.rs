use rayon::prelude::*;
use tracing::{debug, instrument};

use super::{Crossover, Mutation};
use crate::{bounds::Bounds, error::Result, rng::RandomNumberGenerator, DecisionVector};

/// Default minimum number of matings before work is spread over the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// # Variation
///
/// Turns a list of parent pairs into offspring by applying crossover and then
/// mutation to every child.
///
/// One sub-seed per mating is drawn from the run generator in mating order before
/// any work starts. Each mating then owns a private generator, so the offspring
/// are identical whether the batch runs sequentially or on many threads.
///
/// ```rust
/// use evosearch::bounds::Bounds;
/// use evosearch::operators::{PolynomialMutation, SimulatedBinaryCrossover, Variation};
/// use evosearch::rng::RandomNumberGenerator;
///
/// let bounds = Bounds::new(vec![0.0; 3], vec![1.0; 3]).unwrap();
/// let variation = Variation::new(
///     SimulatedBinaryCrossover::new(15.0).unwrap(),
///     PolynomialMutation::new(20.0).unwrap(),
/// );
/// let parents = vec![(vec![0.1, 0.2, 0.3], vec![0.9, 0.8, 0.7])];
/// let mut rng = RandomNumberGenerator::from_seed(1);
///
/// let offspring = variation.offspring(&parents, &bounds, &mut rng).unwrap();
/// assert_eq!(offspring.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Variation<C, M>
where
    C: Crossover,
    M: Mutation,
{
    crossover: C,
    mutation: M,
    parallel_threshold: usize,
}

impl<C, M> Variation<C, M>
where
    C: Crossover,
    M: Mutation,
{
    pub fn new(crossover: C, mutation: M) -> Self {
        Self {
            crossover,
            mutation,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Sets the minimum number of matings processed in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn crossover(&self) -> &C {
        &self.crossover
    }

    pub fn mutation(&self) -> &M {
        &self.mutation
    }

    fn mate(
        &self,
        parents: &(DecisionVector, DecisionVector),
        bounds: &Bounds,
        seed: u64,
    ) -> Result<Vec<DecisionVector>> {
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let children = self
            .crossover
            .crossover(&parents.0, &parents.1, bounds, &mut rng)?;

        children
            .iter()
            .map(|child| self.mutation.mutate(child, bounds, &mut rng))
            .collect()
    }

    /// Produces `crossover.n_offsprings()` children per parent pair, in pair order.
    ///
    /// # Errors
    ///
    /// Propagates the first operator error, e.g. a parent whose length does not
    /// match the bounds.
    #[instrument(level = "debug", skip_all, fields(matings = parents.len()))]
    pub fn offspring(
        &self,
        parents: &[(DecisionVector, DecisionVector)],
        bounds: &Bounds,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<DecisionVector>> {
        let seeds: Vec<u64> = parents.iter().map(|_| rng.next_seed()).collect();

        let batches: Vec<Vec<DecisionVector>> = if parents.len() >= self.parallel_threshold {
            parents
                .par_iter()
                .zip(seeds.par_iter())
                .map(|(pair, &seed)| self.mate(pair, bounds, seed))
                .collect::<Result<Vec<_>>>()?
        } else {
            parents
                .iter()
                .zip(seeds.iter())
                .map(|(pair, &seed)| self.mate(pair, bounds, seed))
                .collect::<Result<Vec<_>>>()?
        };

        let offspring: Vec<DecisionVector> = batches.into_iter().flatten().collect();
        debug!(offspring = offspring.len(), "variation finished");
        Ok(offspring)
    }
}
