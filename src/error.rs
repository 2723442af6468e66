//! # Error Types
//!
//! This module defines the error type shared by the operators, the bounds loader,
//! the configuration layer and the termination engine.
//!
//! Only configuration and input problems are errors. Numeric edge cases inside the
//! operators are resolved locally with fixed floors, insufficient termination
//! history simply means "continue", and an exhausted budget is a regular stop.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use evosearch::error::{SearchError, Result};
//!
//! fn check_eta(eta: f64) -> Result<f64> {
//!     if eta > 0.0 {
//!         Ok(eta)
//!     } else {
//!         Err(SearchError::Configuration(format!("eta must be positive, got {}", eta)))
//!     }
//! }
//!
//! assert!(check_eta(1.0).is_ok());
//! assert!(check_eta(0.0).is_err());
//! ```
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use evosearch::error::{Result, ResultExt};
//! use std::fs::File;
//!
//! fn open_bounds(path: &str) -> Result<()> {
//!     File::open(path).context("Failed to open bounds file")?;
//!     Ok(())
//! }
//!
//! assert!(open_bounds("/definitely/not/here.csv").is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use evosearch::error::{SearchError, OptionExt};
//!
//! fn first_row(rows: &[Vec<f64>]) -> evosearch::error::Result<&Vec<f64>> {
//!     rows.first()
//!         .ok_or_else_search(|| SearchError::Configuration("no rows".to_string()))
//! }
//!
//! assert!(first_row(&[]).is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while configuring or running the search core.
#[derive(Error, Debug)]
pub enum SearchError {
    /// An invalid option value, such as an unknown termination mode or a
    /// negative distribution index.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Box constraints that cannot describe a search space.
    #[error("Invalid bounds at variable {index}: lower = {lower}, upper = {upper}")]
    InvalidBounds { index: usize, lower: f64, upper: f64 },

    /// Vectors whose lengths do not agree with each other or with the bounds.
    #[error("Dimension mismatch: expected {expected} variables, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Error that occurs when NaN or infinity values are encountered.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error raised while reading a tabular bounds file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error raised while reading or writing a parameter file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use evosearch::error::ResultExt;
/// use std::fs::File;
///
/// fn read_file(path: &str) -> evosearch::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to a `SearchError::Other` prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| SearchError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, SearchError>` using a closure
    /// to generate the error.
    fn ok_or_else_search<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SearchError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_search<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SearchError,
    {
        self.ok_or_else(err_fn)
    }
}

/// Converts a standard error to a `SearchError` with context.
///
/// ## Examples
///
/// ```rust
/// use evosearch::error::to_search_error;
/// use std::io;
///
/// fn example() -> evosearch::error::Result<()> {
///     let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
///     Err(to_search_error(io_error, "Failed to read parameters"))
/// }
/// ```
pub fn to_search_error<E: StdError>(error: E, context: &str) -> SearchError {
    SearchError::Other(format!("{}: {}", context, error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bounds_message() {
        let err = SearchError::InvalidBounds {
            index: 3,
            lower: 2.0,
            upper: 1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("variable 3"));
        assert!(msg.contains("lower = 2"));
    }

    #[test]
    fn test_context_wraps_source() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        match io.context("loading bounds") {
            Err(SearchError::Other(msg)) => assert_eq!(msg, "loading bounds: missing"),
            other => panic!("Expected Other error, got {:?}", other),
        }
    }

    #[test]
    fn test_io_conversion() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(SearchError::Io(_))));
    }
}
