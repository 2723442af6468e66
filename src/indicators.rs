//! # Performance indicators
//!
//! Quality measures for sets of objective vectors, all assuming minimisation:
//!
//! - [`dominates`] and [`non_dominated`]: Pareto dominance and the first front.
//! - [`normalize`]: per-objective min–max scaling into `[0, 1]`.
//! - [`hypervolume`]: exact volume dominated by a set and bounded by a reference point.
//! - [`igd_plus`]: inverted generational distance plus, which only counts the
//!   amount by which a set is worse than a reference front.

use std::cmp::Ordering;

use crate::ObjectiveVector;

/// Smallest per-objective range used as a normalisation divisor.
pub const MIN_NORMALIZATION_RANGE: f64 = 1.0e-10;

/// Returns true if `a` is no worse than `b` in every objective and strictly
/// better in at least one.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b.iter()) {
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Returns the indices of the vectors that no other vector dominates, in input order.
pub fn non_dominated(points: &[ObjectiveVector]) -> Vec<usize> {
    (0..points.len())
        .filter(|&i| {
            !points
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && dominates(other, &points[i]))
        })
        .collect()
}

/// Scales every objective of the set into `[0, 1]` using the set's own minimum and
/// maximum. Objectives with a range below [`MIN_NORMALIZATION_RANGE`] are divided
/// by that floor, which maps them to zero.
pub fn normalize(points: &[ObjectiveVector]) -> Vec<ObjectiveVector> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let n_obj = first.len();
    let mut min = vec![f64::INFINITY; n_obj];
    let mut max = vec![f64::NEG_INFINITY; n_obj];
    for point in points {
        for (i, &v) in point.iter().enumerate().take(n_obj) {
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }

    let range: Vec<f64> = min
        .iter()
        .zip(max.iter())
        .map(|(lo, hi)| (hi - lo).max(MIN_NORMALIZATION_RANGE))
        .collect();

    points
        .iter()
        .map(|point| {
            point
                .iter()
                .take(n_obj)
                .enumerate()
                .map(|(i, v)| (v - min[i]) / range[i])
                .collect()
        })
        .collect()
}

/// Exact hypervolume of `points` with respect to `reference`.
///
/// Only points strictly better than the reference in every objective contribute.
/// The computation slices the space along the last objective and recurses, which
/// is quadratic for two objectives and fine for the small fronts a generation
/// produces.
pub fn hypervolume(points: &[ObjectiveVector], reference: &[f64]) -> f64 {
    let inside: Vec<&[f64]> = points
        .iter()
        .filter(|p| {
            p.len() >= reference.len() && p.iter().zip(reference.iter()).all(|(v, r)| v < r)
        })
        .map(|p| p.as_slice())
        .collect();

    slice_volume(&inside, reference)
}

fn slice_volume(points: &[&[f64]], reference: &[f64]) -> f64 {
    let dims = reference.len();
    if points.is_empty() || dims == 0 {
        return 0.0;
    }

    if dims == 1 {
        let best = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        return (reference[0] - best).max(0.0);
    }

    let last = dims - 1;
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[last].partial_cmp(&b[last]).unwrap_or(Ordering::Equal));

    let mut volume = 0.0;
    for k in 0..sorted.len() {
        let upper = sorted.get(k + 1).map_or(reference[last], |next| next[last]);
        let height = upper - sorted[k][last];
        if height > 0.0 {
            volume += slice_volume(&sorted[..=k], &reference[..last]) * height;
        }
    }
    volume
}

/// Inverted generational distance plus of `front` measured against `reference_front`.
///
/// For each reference point `z` the modified distance to the closest `a` in
/// `front` is `sqrt(sum(max(a_i - z_i, 0)^2))`; the result is the mean of those
/// distances. Returns `None` when either set is empty.
pub fn igd_plus(reference_front: &[ObjectiveVector], front: &[ObjectiveVector]) -> Option<f64> {
    if reference_front.is_empty() || front.is_empty() {
        return None;
    }

    let total: f64 = reference_front
        .iter()
        .map(|z| {
            front
                .iter()
                .map(|a| {
                    a.iter()
                        .zip(z.iter())
                        .map(|(ai, zi)| (ai - zi).max(0.0).powi(2))
                        .sum::<f64>()
                        .sqrt()
                })
                .fold(f64::INFINITY, f64::min)
        })
        .sum();

    Some(total / reference_front.len() as f64)
}
