//! Curve simplification: Douglas-Peucker with a deviation cap.
//!
//! Recursive perpendicular-distance reduction over the Cartesian
//! projections of a track. Beyond classic Douglas-Peucker, a
//! `max_deviation` cap changes the algorithm in two coupled ways:
//!
//! - a span is only refined when its maximum deviation lies within
//!   `[epsilon, max_deviation]` inclusive; a span whose maximum
//!   exceeds the cap collapses to its endpoints outright, and
//! - the interior scan stops early once the running maximum has
//!   reached the cap, so the chosen split index depends on scan order.
//!
//! The net effect is a hybrid: moderately off-chord points are
//! preserved through recursive refinement, while spans containing a
//! wildly off-chord point are treated as already failing and collapse
//! entirely. Both behaviors are load-bearing; reshaping this into
//! textbook Douglas-Peucker changes the output.

use crate::types::{Point, Track, TrackPoint};

/// Simplify a track, always retaining its first and last point.
///
/// `epsilon` is the minimum perpendicular deviation (mm) that
/// justifies keeping an interior point; `max_deviation` caps the
/// deviation tolerated when deciding whether to refine a span (pass
/// `f64::INFINITY` for classic uncapped behavior). Tracks with fewer
/// than 2 points are returned unchanged.
#[must_use = "returns the simplified track"]
pub fn simplify(track: &Track, epsilon: f64, max_deviation: f64) -> Track {
    let points = track.points();
    if points.len() < 2 {
        return track.clone();
    }

    let mut kept = vec![false; points.len()];
    kept[0] = true;
    kept[points.len() - 1] = true;

    reduce_span(points, 0, points.len() - 1, epsilon, max_deviation, &mut kept);

    Track::new(
        points
            .iter()
            .zip(&kept)
            .filter(|&(_, k)| *k)
            .map(|(&p, _)| p)
            .collect(),
    )
}

/// Recursive step over the span `[start, end]` (both endpoints already
/// marked kept).
///
/// Scans interior points left to right for the maximum perpendicular
/// distance to the span chord, stopping early once the running maximum
/// has reached `max_deviation`. Refines at the argmax when the maximum
/// lies within `[epsilon, max_deviation]`; otherwise leaves the span's
/// interior unmarked, collapsing it.
fn reduce_span(
    points: &[TrackPoint],
    start: usize,
    end: usize,
    epsilon: f64,
    max_deviation: f64,
    kept: &mut [bool],
) {
    if end <= start + 1 {
        return;
    }

    let chord_start = points[start].point();
    let chord_end = points[end].point();

    let mut max_dist = 0.0_f64;
    let mut max_idx = start;

    for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
        if max_dist >= max_deviation {
            break;
        }
        let d = perpendicular_distance(p.point(), chord_start, chord_end);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    // max_idx == start means every interior point sits exactly on the
    // chord; the span cannot be split and collapses.
    if max_idx > start && max_dist >= epsilon && max_dist <= max_deviation {
        kept[max_idx] = true;
        reduce_span(points, start, max_idx, epsilon, max_deviation, kept);
        reduce_span(points, max_idx, end, epsilon, max_deviation, kept);
    }
}

/// Perpendicular distance from `p` to the infinite line through the
/// chord `start` -> `end`.
///
/// When the chord endpoints coincide, degenerates to the Euclidean
/// distance from `p` to that single point. A zero denominator cannot
/// occur past that check, but returns 0 rather than propagating a
/// division fault.
fn perpendicular_distance(p: Point, start: Point, end: Point) -> f64 {
    if start == end {
        return p.distance(start);
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let numerator =
        (dy.mul_add(p.x, -(dx * p.y)) + end.x.mul_add(start.y, -(end.y * start.x))).abs();
    let denominator = dx.hypot(dy);
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}
