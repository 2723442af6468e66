use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::*;
use crate::error::{Result, SearchError};
use crate::DecisionVector;

/// How strictly design-space movement is judged.
///
/// | Mode | Metric per generation | Window aggregate |
/// |---|---|---|
/// | soft | mean change | mean |
/// | medium | mean change | max |
/// | hard | max change | max |
///
/// `normal` is accepted as an alias of `soft` and `strict` as an alias of `hard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DriftMode {
    Soft,
    Medium,
    Hard,
}

impl DriftMode {
    fn aggregate_generation(&self, values: impl Iterator<Item = f64>) -> Option<f64> {
        match self {
            DriftMode::Soft | DriftMode::Medium => mean(values),
            DriftMode::Hard => max(values),
        }
    }

    fn aggregate_window(&self, values: impl Iterator<Item = f64>) -> Option<f64> {
        match self {
            DriftMode::Soft => mean(values),
            DriftMode::Medium | DriftMode::Hard => max(values),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
}

impl FromStr for DriftMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "soft" | "normal" => Ok(DriftMode::Soft),
            "medium" => Ok(DriftMode::Medium),
            "hard" | "strict" => Ok(DriftMode::Hard),
            other => Err(SearchError::Configuration(format!(
                "The termination criterion mode must be soft, medium or hard, got {:?}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for DriftMode {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DriftMode> for String {
    fn from(mode: DriftMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for DriftMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriftMode::Soft => "soft",
            DriftMode::Medium => "medium",
            DriftMode::Hard => "hard",
        };
        f.write_str(name)
    }
}

/// Watches how far the population moves through the design space.
///
/// Each generation the decision matrix is stored; the metric is the mean (or
/// max) absolute elementwise change between the two most recent matrices. The
/// search continues while the aggregate over the metric window exceeds `tol`.
#[derive(Debug, Clone)]
pub struct DesignSpaceDrift {
    tol: f64,
    mode: DriftMode,
}

impl DesignSpaceDrift {
    pub const DEFAULT_N_LAST: usize = 20;
    pub const DEFAULT_TOL: f64 = 1.0;

    pub fn new(tol: f64, mode: DriftMode) -> Result<Self> {
        if !tol.is_finite() || tol < 0.0 {
            return Err(SearchError::Configuration(format!(
                "The drift tolerance must be a non-negative number, got {}",
                tol
            )));
        }
        Ok(Self { tol, mode })
    }

    /// Parses `mode` case-insensitively; an unknown mode fails here, before any
    /// generation is checked.
    pub fn with_mode_name(tol: f64, mode: &str) -> Result<Self> {
        Self::new(tol, mode.parse()?)
    }

    /// Builds a ready engine judging the last `n_last` metrics.
    #[instrument(level = "debug", skip(budgets))]
    pub fn termination(
        n_last: usize,
        tol: f64,
        mode: &str,
        budgets: CompositeTermination,
    ) -> Result<SlidingWindowTermination<Self>> {
        let policy = Self::with_mode_name(tol, mode)?;
        Ok(SlidingWindowTermination::new(policy, WindowConfig::new(n_last))?.with_budgets(budgets))
    }

    pub fn tol(&self) -> f64 {
        self.tol
    }

    pub fn mode(&self) -> DriftMode {
        self.mode
    }
}

impl WindowPolicy for DesignSpaceDrift {
    type Data = Vec<DecisionVector>;
    type Metric = f64;

    fn store(&self, state: &SearchState<'_>) -> Option<Self::Data> {
        (!state.population.is_empty()).then(|| state.population.to_vec())
    }

    fn metric(&self, data: &[&Self::Data]) -> Option<f64> {
        let [.., previous, current] = data else {
            return None;
        };

        let same_shape = previous.len() == current.len()
            && previous.iter().zip(current.iter()).all(|(a, b)| a.len() == b.len());
        if !same_shape {
            return None;
        }

        let changes = previous
            .iter()
            .zip(current.iter())
            .flat_map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| (y - x).abs()));

        self.mode.aggregate_generation(changes)
    }

    fn decide(&self, metrics: &[&f64]) -> bool {
        self.mode
            .aggregate_window(metrics.iter().map(|m| **m))
            .map_or(true, |drift| drift > self.tol)
    }

    fn metric_value(&self, metric: &f64) -> f64 {
        *metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("SOFT".parse::<DriftMode>().unwrap(), DriftMode::Soft);
        assert_eq!("Medium".parse::<DriftMode>().unwrap(), DriftMode::Medium);
        assert_eq!("hard".parse::<DriftMode>().unwrap(), DriftMode::Hard);
        assert_eq!("normal".parse::<DriftMode>().unwrap(), DriftMode::Soft);
        assert_eq!("Strict".parse::<DriftMode>().unwrap(), DriftMode::Hard);
        assert!(matches!(
            "unknown".parse::<DriftMode>(),
            Err(SearchError::Configuration(_))
        ));
    }

    #[test]
    fn test_unknown_mode_fails_at_construction() {
        assert!(DesignSpaceDrift::with_mode_name(1.0, "unknown").is_err());
        let budgets = CompositeTermination::default();
        assert!(DesignSpaceDrift::termination(20, 1.0, "unknown", budgets).is_err());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        assert!(DesignSpaceDrift::new(-1.0, DriftMode::Soft).is_err());
    }

    #[test]
    fn test_metric_mean_and_max() {
        let previous = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        let current = vec![vec![1.0, 0.0], vec![1.0, 4.0]];
        let data = [&previous, &current];

        let medium = DesignSpaceDrift::new(1.0, DriftMode::Medium).unwrap();
        assert_eq!(medium.metric(&data), Some(1.0));

        let hard = DesignSpaceDrift::new(1.0, DriftMode::Hard).unwrap();
        assert_eq!(hard.metric(&data), Some(3.0));
    }

    #[test]
    fn test_metric_needs_two_matching_snapshots() {
        let policy = DesignSpaceDrift::new(1.0, DriftMode::Soft).unwrap();
        let a = vec![vec![0.0, 0.0]];
        let b = vec![vec![0.0]];
        assert_eq!(policy.metric(&[&a]), None);
        assert_eq!(policy.metric(&[&a, &b]), None);
    }

    #[test]
    fn test_decide_polarity() {
        let soft = DesignSpaceDrift::new(1.0, DriftMode::Soft).unwrap();
        let medium = DesignSpaceDrift::new(1.0, DriftMode::Medium).unwrap();
        let window = [&0.0, &0.5, &2.0];

        // mean = 0.833 does not exceed 1, max = 2 does.
        assert!(!soft.decide(&window));
        assert!(medium.decide(&window));
        assert!(!medium.decide(&[&0.0]));
    }

    #[test]
    fn test_mode_serde_round_trip() {
        let mode: DriftMode = serde_json::from_str("\"HARD\"").unwrap();
        assert_eq!(mode, DriftMode::Hard);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"hard\"");
        assert!(serde_json::from_str::<DriftMode>("\"fuzzy\"").is_err());
    }
}
