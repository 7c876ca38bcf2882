//! Adjacent-distance threshold filtering.
//!
//! The greedy alternative to the Douglas-Peucker simplifier: walk the
//! track once and keep a point only when it has moved far enough from
//! the last point that was kept.

use crate::types::Track;

/// Filter a track by dropping points closer than a threshold distance
/// to the previously *kept* point.
///
/// The threshold is `(threshold_percent / 100) * diameter`, in
/// millimeters. The first point is always kept, so the output is a
/// strictly ordered subsequence of the input containing at least the
/// first input point.
///
/// A threshold of zero (or less) returns the input unchanged — an
/// explicit short-circuit so the all-keep tie behavior at distance 0
/// is not mistaken for a bug.
#[must_use = "returns the filtered track"]
pub fn threshold_filter(track: &Track, threshold_percent: f64, diameter: f64) -> Track {
    let threshold = threshold_percent / 100.0 * diameter;
    let points = track.points();
    if points.len() < 2 || threshold <= 0.0 {
        return track.clone();
    }

    let mut kept = Vec::with_capacity(points.len());
    kept.push(points[0]);
    let mut last_kept = points[0];

    for &p in &points[1..] {
        if last_kept.point().distance(p.point()) >= threshold {
            kept.push(p);
            last_kept = p;
        }
    }

    Track::new(kept)
}
