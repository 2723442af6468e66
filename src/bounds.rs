//! # Bounds
//!
//! Box constraints of the decision space. A `Bounds` value is validated once,
//! when it is created, and stays immutable for the lifetime of a run. Every
//! operator receives it by reference and uses [`Bounds::repair`] as its last step
//! so that no component of a produced decision vector leaves `[lower_i, upper_i]`.
//!
//! Bounds are usually read from a two-row CSV file: row 0 holds the lower bounds,
//! row 1 the upper bounds, one column per decision variable.
//!
//! ```rust
//! use evosearch::bounds::Bounds;
//!
//! let bounds = Bounds::new(vec![0.0, -1.0], vec![10.0, 1.0]).unwrap();
//! assert_eq!(bounds.num_variables(), 2);
//!
//! let mut x = vec![12.0, -3.0];
//! bounds.repair(&mut x);
//! assert_eq!(x, vec![10.0, -1.0]);
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, SearchError};
use crate::DecisionVector;

/// Immutable lower/upper box constraints, one pair per decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct RawBounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl TryFrom<RawBounds> for Bounds {
    type Error = SearchError;

    fn try_from(raw: RawBounds) -> Result<Self> {
        Bounds::new(raw.lower, raw.upper)
    }
}

impl From<Bounds> for RawBounds {
    fn from(bounds: Bounds) -> Self {
        RawBounds {
            lower: bounds.lower,
            upper: bounds.upper,
        }
    }
}

impl Bounds {
    /// Creates validated bounds.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` when the vectors differ in length.
    /// - `Configuration` when there are no variables.
    /// - `InvalidBounds` when any `lower_i >= upper_i`, a value is not finite or
    ///   the width `upper_i - lower_i` overflows.
    #[instrument(level = "debug", skip_all, fields(num_variables = lower.len()))]
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.len() != upper.len() {
            return Err(SearchError::DimensionMismatch {
                expected: lower.len(),
                actual: upper.len(),
            });
        }

        if lower.is_empty() {
            return Err(SearchError::Configuration(
                "Bounds must describe at least one variable".to_string(),
            ));
        }

        if let Some((index, (&lo, &hi))) = lower
            .iter()
            .zip(upper.iter())
            .enumerate()
            .find(|(_, (lo, hi))| lo >= hi || !(*hi - *lo).is_finite())
        {
            return Err(SearchError::InvalidBounds {
                index,
                lower: lo,
                upper: hi,
            });
        }

        Ok(Self { lower, upper })
    }

    /// Reads bounds from a two-row CSV source without a header row.
    ///
    /// Additional rows are ignored; fewer than two rows is a configuration error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(2);
        for record in csv_reader.records().take(2) {
            let record = record?;
            let row = record
                .iter()
                .enumerate()
                .map(|(column, field)| {
                    field.parse::<f64>().map_err(|e| {
                        SearchError::Configuration(format!(
                            "Bounds row {} column {} is not a number ({:?}): {}",
                            rows.len(),
                            column,
                            field,
                            e
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(row);
        }

        let mut rows = rows.into_iter();
        match (rows.next(), rows.next()) {
            (Some(lower), Some(upper)) => {
                debug!(num_variables = lower.len(), "bounds loaded");
                Self::new(lower, upper)
            }
            _ => Err(SearchError::Configuration(
                "Bounds source must contain a lower and an upper row".to_string(),
            )),
        }
    }

    /// Reads bounds from a two-row CSV file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Returns a copy whose upper bounds are widened by `10^-decimals`.
    ///
    /// Sampling draws from the half-open interval `[lower, upper)`; closing the
    /// interval at the reporting precision makes the upper value reachable once
    /// values are rounded to `decimals` places.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `decimals` does not fit an `i32`, and
    /// `InvalidBounds` when a widened upper bound is no longer finite.
    pub fn close_upper(&self, decimals: u32) -> Result<Self> {
        let exponent = i32::try_from(decimals).map_err(|_| {
            SearchError::Configuration(format!("Too many decimals to close bounds: {}", decimals))
        })?;
        let step = 10f64.powi(-exponent);
        Self::new(
            self.lower.clone(),
            self.upper.iter().map(|hi| hi + step).collect(),
        )
    }

    pub fn num_variables(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Returns `(lower_i, upper_i)` for variable `i`.
    pub fn get(&self, i: usize) -> (f64, f64) {
        (self.lower[i], self.upper[i])
    }

    /// Iterates over `(lower_i, upper_i)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lower.iter().copied().zip(self.upper.iter().copied())
    }

    /// Returns an error unless `x` has one component per variable.
    pub fn check_dimension(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.num_variables() {
            return Err(SearchError::DimensionMismatch {
                expected: self.num_variables(),
                actual: x.len(),
            });
        }
        Ok(())
    }

    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.num_variables()
            && x
                .iter()
                .zip(self.iter())
                .all(|(&v, (lo, hi))| v >= lo && v <= hi)
    }

    /// Clamps a single value of variable `i` into its bounds. NaN maps to the
    /// lower bound.
    pub fn clamp(&self, i: usize, value: f64) -> f64 {
        let (lo, hi) = self.get(i);
        if value.is_nan() || value < lo {
            lo
        } else if value > hi {
            hi
        } else {
            value
        }
    }

    /// Sets every out-of-range component to the violated bound.
    pub fn repair(&self, x: &mut DecisionVector) {
        for (i, value) in x.iter_mut().enumerate().take(self.num_variables()) {
            *value = self.clamp(i, *value);
        }
    }
}
