//! # Search parameters
//!
//! `SearchParameters` collects the run-level settings of a search: the seed, the
//! variation operator settings, rounding used when loading bounds and reporting,
//! and a `termination` section describing budgets and convergence criteria.
//!
//! Parameters are usually read from JSON. Keys mirror the names used in
//! preference files, every key is optional and falls back to its default:
//!
//! ```rust
//! use evosearch::config::SearchParameters;
//! use evosearch::termination::DriftMode;
//!
//! let params = SearchParameters::from_json_str(r#"{
//!     "SEED": 7,
//!     "CROSSOVER_PROBABILITY": 0.9,
//!     "termination": { "mode": "hard", "n_max_gen": 250, "max_time": "01:00:00" }
//! }"#).unwrap();
//!
//! assert_eq!(params.seed(), 7);
//! assert_eq!(params.crossover_eta(), 1.0);
//! assert_eq!(params.termination().mode, DriftMode::Hard);
//! ```
//!
//! The same values can be assembled in code with [`SearchParametersBuilder`]:
//!
//! ```rust
//! use evosearch::config::SearchParameters;
//!
//! let params = SearchParameters::builder()
//!     .with_seed(42)
//!     .with_crossover_eta(15.0)
//!     .with_mutation_eta(20.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.seed(), 42);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    bounds::Bounds,
    error::{Result, SearchError},
    operators::{
        crossover::validate_probability, BoundedSampler, PolynomialMutation,
        SimulatedBinaryCrossover, Variation,
    },
    reporting::TracingDisplay,
    rng::RandomNumberGenerator,
    termination::{
        CompositeTermination, DesignSpaceDrift, DriftMode, MaxTime, MaxWallTime,
        ParetoConvergence, SlidingWindowTermination, WindowConfig,
    },
};

pub const DEFAULT_SEED: u64 = 4144415054;
pub const DEFAULT_CROSSOVER_ETA: f64 = 1.0;
pub const DEFAULT_MUTATION_ETA: f64 = 1.0;
pub const DEFAULT_CROSSOVER_PROBABILITY: f64 = 0.8;
pub const DEFAULT_DECIMALS: u32 = 2;

/// Run-level settings of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    #[serde(rename = "SEED")]
    seed: u64,
    #[serde(rename = "CROSSOVER_ETA")]
    crossover_eta: f64,
    #[serde(rename = "MUTATION_ETA")]
    mutation_eta: f64,
    #[serde(rename = "CROSSOVER_PROBABILITY")]
    crossover_probability: f64,
    #[serde(rename = "SAMPLING_DECIMALS")]
    sampling_decimals: u32,
    #[serde(rename = "OUTPUT_DECIMALS")]
    output_decimals: u32,
    termination: TerminationParameters,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            crossover_eta: DEFAULT_CROSSOVER_ETA,
            mutation_eta: DEFAULT_MUTATION_ETA,
            crossover_probability: DEFAULT_CROSSOVER_PROBABILITY,
            sampling_decimals: DEFAULT_DECIMALS,
            output_decimals: DEFAULT_DECIMALS,
            termination: TerminationParameters::default(),
        }
    }
}

impl SearchParameters {
    pub fn builder() -> SearchParametersBuilder {
        SearchParametersBuilder::new()
    }

    /// Parses and validates parameters from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reads and validates parameters from a JSON file.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let params = Self::from_json_str(&json)?;
        debug!(?params, "search parameters loaded");
        Ok(params)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every setting that an operator or criterion would otherwise reject later.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a non-positive distribution index, a
    /// crossover probability outside `[0, 1]` or an invalid termination section.
    pub fn validate(&self) -> Result<()> {
        SimulatedBinaryCrossover::new(self.crossover_eta)?;
        PolynomialMutation::new(self.mutation_eta)?;
        validate_probability(self.crossover_probability, "crossover")?;
        self.termination.validate()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn crossover_eta(&self) -> f64 {
        self.crossover_eta
    }

    pub fn mutation_eta(&self) -> f64 {
        self.mutation_eta
    }

    pub fn crossover_probability(&self) -> f64 {
        self.crossover_probability
    }

    pub fn sampling_decimals(&self) -> u32 {
        self.sampling_decimals
    }

    pub fn output_decimals(&self) -> u32 {
        self.output_decimals
    }

    pub fn termination(&self) -> &TerminationParameters {
        &self.termination
    }

    /// The run generator, seeded with `SEED`.
    pub fn rng(&self) -> RandomNumberGenerator {
        RandomNumberGenerator::from_seed(self.seed)
    }

    /// A sampler pinned to `SEED`, so the initial population does not depend on
    /// how the run generator has been used before.
    pub fn sampler(&self) -> BoundedSampler {
        BoundedSampler::with_seed(self.seed)
    }

    /// SBX with `CROSSOVER_ETA`, applied to a mating with `CROSSOVER_PROBABILITY`.
    pub fn crossover(&self) -> Result<SimulatedBinaryCrossover> {
        SimulatedBinaryCrossover::new(self.crossover_eta)?
            .with_probability(self.crossover_probability)
    }

    /// Polynomial mutation with `MUTATION_ETA` and the `1 / n_var` default probability.
    pub fn mutation(&self) -> Result<PolynomialMutation> {
        PolynomialMutation::new(self.mutation_eta)
    }

    pub fn variation(&self) -> Result<Variation<SimulatedBinaryCrossover, PolynomialMutation>> {
        Ok(Variation::new(self.crossover()?, self.mutation()?))
    }

    /// Loads a two-row bounds file and widens the upper row by `10^-SAMPLING_DECIMALS`.
    pub fn load_bounds<P: AsRef<Path>>(&self, path: P) -> Result<Bounds> {
        Bounds::from_csv_path(path)?.close_upper(self.sampling_decimals)
    }

    /// A progress display rounding to `OUTPUT_DECIMALS`.
    pub fn display(&self) -> TracingDisplay {
        TracingDisplay::new(self.output_decimals)
    }
}

/// The `termination` section of [`SearchParameters`].
///
/// `tol`, `mode` and `n_last` configure the design-space drift criterion,
/// `epsilon` and `reference_point` the Pareto convergence criterion. The budgets
/// and `nth_gen` apply to either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationParameters {
    pub tol: f64,
    pub epsilon: f64,
    pub mode: DriftMode,
    pub n_last: usize,
    pub nth_gen: usize,
    pub reference_point: Vec<f64>,
    pub n_max_gen: Option<usize>,
    pub n_max_evals: Option<usize>,
    pub max_time: Option<MaxTime>,
}

impl Default for TerminationParameters {
    fn default() -> Self {
        Self {
            tol: DesignSpaceDrift::DEFAULT_TOL,
            epsilon: ParetoConvergence::DEFAULT_EPSILON,
            mode: DriftMode::Medium,
            n_last: DesignSpaceDrift::DEFAULT_N_LAST,
            nth_gen: 1,
            reference_point: vec![1.0, 1.0],
            n_max_gen: None,
            n_max_evals: None,
            max_time: None,
        }
    }
}

impl TerminationParameters {
    pub fn validate(&self) -> Result<()> {
        DesignSpaceDrift::new(self.tol, self.mode)?;
        ParetoConvergence::with_reference_point(self.epsilon, self.reference_point.clone())?;
        self.drift_window().validate()?;
        self.pareto_window().validate()?;
        self.wall_time()?;
        Ok(())
    }

    /// The wall-time budget, if one is configured.
    pub fn wall_time(&self) -> Result<Option<MaxWallTime>> {
        self.max_time.as_ref().map(MaxWallTime::from_max_time).transpose()
    }

    /// Hard budgets shared by both criteria.
    pub fn budgets(&self) -> Result<CompositeTermination> {
        Ok(CompositeTermination::budgets(
            self.n_max_gen,
            self.n_max_evals,
            self.wall_time()?,
        ))
    }

    fn drift_window(&self) -> WindowConfig {
        WindowConfig::new(self.n_last).with_nth_gen(self.nth_gen)
    }

    fn pareto_window(&self) -> WindowConfig {
        WindowConfig::default().with_nth_gen(self.nth_gen)
    }

    /// Builds a design-space drift engine judging the last `n_last` metrics.
    pub fn build_design_drift(&self) -> Result<SlidingWindowTermination<DesignSpaceDrift>> {
        let policy = DesignSpaceDrift::new(self.tol, self.mode)?;
        Ok(SlidingWindowTermination::new(policy, self.drift_window())?
            .with_budgets(self.budgets()?))
    }

    /// Builds a Pareto convergence engine deciding on every metric.
    pub fn build_pareto(&self) -> Result<SlidingWindowTermination<ParetoConvergence>> {
        let policy =
            ParetoConvergence::with_reference_point(self.epsilon, self.reference_point.clone())?;
        Ok(SlidingWindowTermination::new(policy, self.pareto_window())?
            .with_budgets(self.budgets()?))
    }
}

/// Fluent construction of [`SearchParameters`], validated on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct SearchParametersBuilder {
    params: SearchParameters,
}

impl SearchParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = seed;
        self
    }

    pub fn with_crossover_eta(mut self, eta: f64) -> Self {
        self.params.crossover_eta = eta;
        self
    }

    pub fn with_mutation_eta(mut self, eta: f64) -> Self {
        self.params.mutation_eta = eta;
        self
    }

    pub fn with_crossover_probability(mut self, probability: f64) -> Self {
        self.params.crossover_probability = probability;
        self
    }

    pub fn with_sampling_decimals(mut self, decimals: u32) -> Self {
        self.params.sampling_decimals = decimals;
        self
    }

    pub fn with_output_decimals(mut self, decimals: u32) -> Self {
        self.params.output_decimals = decimals;
        self
    }

    pub fn with_termination(mut self, termination: TerminationParameters) -> Self {
        self.params.termination = termination;
        self
    }

    pub fn build(self) -> Result<SearchParameters> {
        self.params.validate().map_err(|e| match e {
            SearchError::Configuration(msg) => {
                SearchError::Configuration(format!("Invalid search parameters: {}", msg))
            }
            other => other,
        })?;
        Ok(self.params)
    }
}
