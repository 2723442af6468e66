//! Duplicate elimination is owned by the driver. The core only defines the
//! predicate it plugs in and a pass-through default that never reports a duplicate.

use std::fmt::Debug;

use crate::DecisionVector;

/// Decides whether two decision vectors count as the same individual.
pub trait DuplicateElimination: Debug + Send + Sync {
    fn is_equal(&self, a: &[f64], b: &[f64]) -> bool;

    /// Removes from `candidates` every vector equal to an earlier candidate or to
    /// any vector in `existing`, preserving the order of the survivors.
    fn eliminate(
        &self,
        candidates: Vec<DecisionVector>,
        existing: &[DecisionVector],
    ) -> Vec<DecisionVector> {
        let mut kept: Vec<DecisionVector> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let duplicate = existing
                .iter()
                .chain(kept.iter())
                .any(|other| self.is_equal(&candidate, other));
            if !duplicate {
                kept.push(candidate);
            }
        }
        kept
    }
}

/// Pass-through: no two vectors are ever considered equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepDuplicates;

impl DuplicateElimination for KeepDuplicates {
    fn is_equal(&self, _a: &[f64], _b: &[f64]) -> bool {
        false
    }
}
