//! Distance measures and path length accumulation.
//!
//! Two interchangeable measures are provided: the chord distance
//! computed directly from polar form via the law of cosines, and the
//! Euclidean distance between Cartesian projections. They agree for
//! correctly scaled inputs; the Cartesian form is the canonical metric
//! used by the filter, the length accumulator, and the deviation
//! ranker, because it has no clamping risk near theta wraparound.

use crate::types::{PolarPoint, Track};

/// Chord distance between two polar samples, via the law of cosines:
/// `sqrt(r1² + r2² − 2·r1·r2·cos(θ2−θ1))`.
///
/// This is the exact Euclidean distance between the two points in a
/// shared Cartesian frame. The argument under the square root is
/// clamped at zero: floating-point drift can push it slightly negative
/// when the two samples coincide.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn chord_distance(a: PolarPoint, b: PolarPoint) -> f64 {
    let cos_dt = (b.theta - a.theta).cos();
    // Plain (non-fused) arithmetic: for coincident samples the terms
    // cancel to exactly zero, which `mul_add` does not guarantee.
    let arg = a.rho * a.rho + b.rho * b.rho - 2.0 * a.rho * b.rho * cos_dt;
    arg.max(0.0).sqrt()
}

/// Total path length of a track: the sum of Euclidean distances
/// between every consecutive pair of projected points.
///
/// Returns 0.0 for tracks with fewer than 2 points.
#[must_use]
pub fn total_length(track: &Track) -> f64 {
    track
        .points()
        .windows(2)
        .map(|w| w[0].point().distance(w[1].point()))
        .sum()
}

/// Euclidean distances between every consecutive pair of projected
/// points. Empty for tracks with fewer than 2 points.
#[must_use]
pub fn segment_distances(track: &Track) -> Vec<f64> {
    track
        .points()
        .windows(2)
        .map(|w| w[0].point().distance(w[1].point()))
        .collect()
}

/// Bin values into `n_buckets` equal-width buckets spanning
/// `[min, max]` of the input.
///
/// The maximum value lands in the last bucket. A zero-width range
/// (all values equal) puts everything in the first bucket. Returns an
/// empty vector when `n_buckets` is 0, and all-zero counts when
/// `values` is empty.
#[must_use]
pub fn histogram(values: &[f64], n_buckets: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_buckets];
    if n_buckets == 0 || values.is_empty() {
        return counts;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = max - min;

    for &v in values {
        let idx = if width > 0.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            #[allow(clippy::cast_precision_loss)]
            let raw = ((v - min) / width * n_buckets as f64) as usize;
            raw.min(n_buckets - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }
    counts
}
