//! Sinks for per-generation progress.
//!
//! Nothing in this module feeds back into the search. A driver calls a
//! [`GenerationObserver`] with the full matrices of every generation and a
//! [`ProgressDisplay`] with a short [`GenerationSummary`].

use std::fmt::Debug;

use tracing::info;

use crate::{DecisionVector, ObjectiveVector};

/// Receives the objective and decision matrices of the current population.
pub trait GenerationObserver: Debug {
    fn observe(
        &mut self,
        generation: usize,
        objectives: &[ObjectiveVector],
        decisions: &[DecisionVector],
    );
}

/// Keeps every observed generation in memory, oldest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecorder {
    objectives: Vec<Vec<ObjectiveVector>>,
    decisions: Vec<Vec<DecisionVector>>,
    generations: Vec<usize>,
}

impl HistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.generations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn generations(&self) -> &[usize] {
        &self.generations
    }

    /// Objective matrices, one per observed generation.
    pub fn objectives(&self) -> &[Vec<ObjectiveVector>] {
        &self.objectives
    }

    /// Decision matrices, one per observed generation.
    pub fn decisions(&self) -> &[Vec<DecisionVector>] {
        &self.decisions
    }
}

impl GenerationObserver for HistoryRecorder {
    fn observe(
        &mut self,
        generation: usize,
        objectives: &[ObjectiveVector],
        decisions: &[DecisionVector],
    ) {
        self.generations.push(generation);
        self.objectives.push(objectives.to_vec());
        self.decisions.push(decisions.to_vec());
    }
}

/// Scalar overview of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub generation: usize,
    pub evaluations: usize,
    /// Mean of every objective over the population.
    pub mean_objectives: Vec<f64>,
    /// Current termination metric, already formatted. `None` before the first metric exists.
    pub termination_metric: Option<String>,
}

impl GenerationSummary {
    pub fn new(generation: usize, evaluations: usize, objectives: &[ObjectiveVector]) -> Self {
        Self {
            generation,
            evaluations,
            mean_objectives: column_means(objectives),
            termination_metric: None,
        }
    }

    /// Attaches a metric value; `checked` marks a generation on which the
    /// termination criterion was consulted.
    pub fn with_termination_metric(
        mut self,
        value: Option<f64>,
        checked: bool,
        decimals: u32,
    ) -> Self {
        self.termination_metric = value.map(|v| {
            let text = format!("{:.*}", decimals as usize, v);
            if checked {
                format!("{} -- CHECK", text)
            } else {
                text
            }
        });
        self
    }
}

fn column_means(rows: &[ObjectiveVector]) -> Vec<f64> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    let mut sums = vec![0.0; first.len()];
    for row in rows {
        for (sum, v) in sums.iter_mut().zip(row.iter()) {
            *sum += v;
        }
    }
    sums.iter().map(|s| s / rows.len() as f64).collect()
}

/// Receives one summary per generation.
pub trait ProgressDisplay: Debug {
    fn display(&mut self, summary: &GenerationSummary);
}

/// Writes summaries as `info` events, rounded to a fixed number of decimals.
#[derive(Debug, Clone)]
pub struct TracingDisplay {
    decimals: u32,
}

impl TracingDisplay {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Formats the mean objectives as `[a, b]` with the configured precision.
    pub fn format_means(&self, means: &[f64]) -> String {
        let values: Vec<String> = means
            .iter()
            .map(|m| format!("{:.*}", self.decimals as usize, m))
            .collect();
        format!("[{}]", values.join(", "))
    }
}

impl ProgressDisplay for TracingDisplay {
    fn display(&mut self, summary: &GenerationSummary) {
        info!(
            generation = summary.generation,
            evaluations = summary.evaluations,
            mean_objectives = %self.format_means(&summary.mean_objectives),
            termination_metric = summary.termination_metric.as_deref().unwrap_or("N/A"),
            "generation finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_generations_in_order() {
        let mut history = HistoryRecorder::new();
        history.observe(1, &[vec![1.0, 2.0]], &[vec![0.1]]);
        history.observe(2, &[vec![0.5, 1.0]], &[vec![0.2]]);

        assert_eq!(history.len(), 2);
        assert_eq!(history.generations(), &[1, 2]);
        assert_eq!(history.objectives()[1], vec![vec![0.5, 1.0]]);
        assert_eq!(history.decisions()[0], vec![vec![0.1]]);
    }

    #[test]
    fn test_summary_means() {
        let objectives = vec![vec![1.0, 10.0], vec![3.0, 20.0]];
        let summary = GenerationSummary::new(4, 40, &objectives);
        assert_eq!(summary.mean_objectives, vec![2.0, 15.0]);
        assert!(summary.termination_metric.is_none());
        assert!(GenerationSummary::new(1, 0, &[]).mean_objectives.is_empty());
    }

    #[test]
    fn test_metric_text() {
        let summary =
            GenerationSummary::new(20, 400, &[]).with_termination_metric(Some(0.12345), true, 2);
        assert_eq!(summary.termination_metric.as_deref(), Some("0.12 -- CHECK"));

        let summary =
            GenerationSummary::new(3, 60, &[]).with_termination_metric(Some(1.0), false, 3);
        assert_eq!(summary.termination_metric.as_deref(), Some("1.000"));

        let summary = GenerationSummary::new(1, 20, &[]).with_termination_metric(None, false, 2);
        assert!(summary.termination_metric.is_none());
    }

    #[test]
    fn test_display_rounds() {
        let display = TracingDisplay::new(1);
        assert_eq!(display.format_means(&[0.26, 12.0]), "[0.3, 12.0]");
    }
}
