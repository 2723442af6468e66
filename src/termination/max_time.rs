use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::*;
use crate::error::{Result, SearchError};

/// A wall-time budget as written in configuration: a number of seconds or a
/// duration string.
///
/// Accepted strings are plain seconds (`"90"`, `"1.5"`), a number with a unit
/// suffix (`"30s"`, `"15m"`, `"2h"`, `"1d"`) or a clock value (`"01:30:00"`,
/// `"45:00"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaxTime {
    Seconds(f64),
    Text(String),
}

impl MaxTime {
    /// Converts the budget into a duration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unparsable, negative or non-finite values.
    pub fn to_duration(&self) -> Result<Duration> {
        let seconds = match self {
            MaxTime::Seconds(seconds) => *seconds,
            MaxTime::Text(text) => parse_seconds(text)?,
        };

        if seconds < 0.0 {
            return Err(out_of_range(seconds));
        }

        Duration::try_from_secs_f64(seconds).map_err(|_| out_of_range(seconds))
    }
}

impl From<u64> for MaxTime {
    fn from(seconds: u64) -> Self {
        MaxTime::Seconds(seconds as f64)
    }
}

impl From<f64> for MaxTime {
    fn from(seconds: f64) -> Self {
        MaxTime::Seconds(seconds)
    }
}

impl From<&str> for MaxTime {
    fn from(text: &str) -> Self {
        MaxTime::Text(text.to_string())
    }
}

fn out_of_range(seconds: f64) -> SearchError {
    SearchError::Configuration(format!(
        "The maximum run time must be a non-negative, representable number of seconds, got {}",
        seconds
    ))
}

fn invalid_time(text: &str) -> SearchError {
    SearchError::Configuration(format!(
        "The maximum run time {:?} is neither a number of seconds nor a duration \
         such as \"02:30:00\" or \"90m\"",
        text
    ))
}

fn parse_number(text: &str, original: &str) -> Result<f64> {
    f64::from_str(text.trim()).map_err(|_| invalid_time(original))
}

fn parse_seconds(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(invalid_time(text));
    }

    if trimmed.contains(':') {
        let parts: Vec<&str> = trimmed.split(':').collect();
        if parts.len() > 3 {
            return Err(invalid_time(text));
        }
        return parts.iter().try_fold(0.0, |total, part| {
            let value = parse_number(part, text)?;
            if value < 0.0 {
                return Err(invalid_time(text));
            }
            Ok(total * 60.0 + value)
        });
    }

    let multiplier = match trimmed.chars().last() {
        Some('s') => Some(1.0),
        Some('m') => Some(60.0),
        Some('h') => Some(3600.0),
        Some('d') => Some(86400.0),
        _ => None,
    };

    match multiplier {
        Some(multiplier) => Ok(parse_number(&trimmed[..trimmed.len() - 1], text)? * multiplier),
        None => parse_number(trimmed, text),
    }
}

/// A termination criteria which is in terminated state when the run has been
/// going for at least the configured wall time.
///
/// The budget is built from configuration alone. The reference instant is set
/// either explicitly with [`MaxWallTime::start`] or, on the first check, from the
/// driver's recorded run start, so every criterion of a run measures from the
/// same instant.
#[derive(Debug, Clone)]
pub struct MaxWallTime {
    limit: Duration,
    start: Option<Instant>,
}

impl MaxWallTime {
    pub fn new(limit: Duration) -> Self {
        Self { limit, start: None }
    }

    /// Creates the budget from a configuration value.
    pub fn from_max_time(max_time: &MaxTime) -> Result<Self> {
        Ok(Self::new(max_time.to_duration()?))
    }

    /// Fixes the instant the budget is measured from.
    pub fn start(&mut self, run_start: Instant) {
        debug!(limit_secs = self.limit.as_secs_f64(), "wall time budget started");
        self.start = Some(run_start);
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.start
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    fn elapsed(&self, state: &SearchState<'_>) -> Duration {
        let start = self.start.unwrap_or(state.started_at);
        Instant::now().saturating_duration_since(start)
    }
}

impl Termination for MaxWallTime {
    fn is_termination(&mut self, state: &SearchState<'_>) -> bool {
        if self.start.is_none() {
            self.start(state.started_at);
        }

        let elapsed = self.elapsed(state);
        let exhausted = elapsed >= self.limit;
        if exhausted {
            info!(
                elapsed_secs = elapsed.as_secs_f64(),
                limit_secs = self.limit.as_secs_f64(),
                "wall time budget exhausted"
            );
        }
        exhausted
    }

    fn estimate(&self, state: &SearchState<'_>) -> f64 {
        if self.limit.is_zero() {
            return 1.;
        }
        (self.elapsed(state).as_secs_f64() / self.limit.as_secs_f64()).min(1.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        let cases = [
            ("90", 90.0),
            ("1.5", 1.5),
            ("30s", 30.0),
            ("15m", 900.0),
            ("2h", 7200.0),
            ("1d", 86400.0),
            ("01:30:00", 5400.0),
            ("45:10", 2710.0),
            (" 10 ", 10.0),
        ];
        for (text, expected) in cases {
            let duration = MaxTime::from(text).to_duration().unwrap();
            assert!((duration.as_secs_f64() - expected).abs() < 1e-9, "{}", text);
        }
    }

    #[test]
    fn test_rejects_garbage() {
        for text in ["", "soon", "1:2:3:4", "-5", "12x", "1:-2"] {
            assert!(
                matches!(MaxTime::from(text).to_duration(), Err(SearchError::Configuration(_))),
                "{}",
                text
            );
        }
        assert!(MaxTime::Seconds(f64::INFINITY).to_duration().is_err());
        assert!(MaxTime::Seconds(f64::NAN).to_duration().is_err());
        assert!(matches!(
            MaxTime::Seconds(1e20).to_duration(),
            Err(SearchError::Configuration(_))
        ));
        assert!(matches!(
            MaxTime::from("1e18d").to_duration(),
            Err(SearchError::Configuration(_))
        ));
    }

    #[test]
    fn test_deserializes_number_or_text() {
        let number: MaxTime = serde_json::from_str("120").unwrap();
        assert_eq!(number, MaxTime::Seconds(120.0));
        let text: MaxTime = serde_json::from_str("\"00:02:00\"").unwrap();
        assert_eq!(text.to_duration().unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_lazy_start_uses_driver_start() {
        let run_start = Instant::now()
            .checked_sub(Duration::from_secs(10))
            .unwrap_or_else(Instant::now);
        let state = SearchState::new(1, 0, run_start);

        let mut budget = MaxWallTime::new(Duration::from_secs(3600));
        assert!(budget.started_at().is_none());
        assert!(!budget.is_termination(&state));
        assert_eq!(budget.started_at(), Some(run_start));
    }

    #[test]
    fn test_exhausted_budget() {
        let Some(run_start) = Instant::now().checked_sub(Duration::from_secs(5)) else {
            return;
        };
        let state = SearchState::new(1, 0, Instant::now());

        let mut budget = MaxWallTime::new(Duration::from_secs(2));
        budget.start(run_start);
        assert!(budget.is_termination(&state));
        assert_eq!(budget.estimate(&state), 1.);
    }
}
