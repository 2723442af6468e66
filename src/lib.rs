//! # evosearch
//!
//! The reusable core of a bi-objective evolutionary search over a bounded,
//! real-valued decision space: operators that create and vary candidates, and
//! an adaptive termination engine that decides when the search has stopped
//! making progress.
//!
//! An external driver owns the generational loop. Each generation it asks the
//! [`operators`] for offspring, evaluates them with an [`Evaluator`], performs
//! its own survival, and then hands a [`SearchState`] to a
//! [`termination::SlidingWindowTermination`].
//!
//! ```rust
//! use std::time::Instant;
//!
//! use evosearch::bounds::Bounds;
//! use evosearch::operators::{BoundedSampler, Sampling};
//! use evosearch::rng::RandomNumberGenerator;
//! use evosearch::termination::{CompositeTermination, DesignSpaceDrift};
//! use evosearch::SearchState;
//!
//! let bounds = Bounds::new(vec![0.0, 0.0], vec![10.0, 10.0]).unwrap();
//! let mut rng = RandomNumberGenerator::from_seed(4144415054);
//! let population = BoundedSampler::new().sample(&bounds, 20, &mut rng);
//!
//! let budgets = CompositeTermination::budgets(Some(100), None, None);
//! let mut termination = DesignSpaceDrift::termination(20, 1.0, "medium", budgets).unwrap();
//!
//! let state = SearchState::new(1, 20, Instant::now()).with_population(&population);
//! assert!(termination.check(&state).should_continue());
//! ```

pub mod bounds;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod indicators;
pub mod operators;
pub mod reporting;
pub mod rng;
pub mod state;
pub mod termination;

/// One candidate solution, one value per decision variable.
pub type DecisionVector = Vec<f64>;

/// Objective values of one candidate, all minimised.
pub type ObjectiveVector = Vec<f64>;

// Re-export commonly used types for convenience
pub use bounds::Bounds;
pub use config::{SearchParameters, TerminationParameters};
pub use error::{OptionExt, Result, ResultExt, SearchError};
pub use evaluator::Evaluator;
pub use rng::RandomNumberGenerator;
pub use state::SearchState;
