//! thrim-core: Pure polar path trimming core (sans-IO).
//!
//! Reduces the point count of theta-rho tracks (traced paths for polar
//! sand tables) through either Douglas-Peucker simplification with a
//! deviation cap, or a greedy adjacent-distance threshold filter, then
//! reports before/after statistics.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! strings and structured data and returns structured data. File and
//! directory handling live in the `thrim` CLI; serialization of output
//! formats lives in `thrim-export`. Everything here is deterministic
//! and free of shared state, so callers may process independent tracks
//! concurrently if they wish.

pub mod deviation;
pub mod filter;
pub mod metric;
pub mod parse;
pub mod simplify;
pub mod types;

pub use deviation::rank_deviations;
pub use filter::threshold_filter;
pub use metric::{chord_distance, histogram, segment_distances, total_length};
pub use parse::{Parsed, SkippedLine, parse_thr};
pub use simplify::simplify;
pub use types::{
    Deviation, Point, PolarPoint, Track, TrackPoint, TrimConfig, TrimError, TrimResult, TrimStats,
};

/// Run the trim pipeline on one track.
///
/// # Pipeline steps
///
/// 1. Reduce the track: Douglas-Peucker simplification
///    (`config.use_simplifier`) or adjacent-distance threshold filter.
/// 2. Restore endpoints: the first and last points of the output are
///    forcibly overwritten with the first and last points of the
///    input, guarding against drift from the degenerate-span
///    shortcuts inside the strategies.
/// 3. Compute statistics: point counts, total path lengths, and the
///    top positional deviations.
///
/// An empty input track produces an empty result rather than an error.
///
/// # Errors
///
/// Returns [`TrimError::InvalidConfig`] when the configuration is
/// unusable (non-positive diameter, negative or NaN epsilon, threshold
/// or deviation cap).
///
/// # Examples
///
/// ```
/// use thrim_core::{Track, TrackPoint, TrimConfig, trim};
///
/// let track = Track::new(vec![
///     TrackPoint::from_polar(0.0, 10.0),
///     TrackPoint::from_polar(0.001, 10.0),
///     TrackPoint::from_polar(1.0, 10.0),
/// ]);
/// let result = trim(&track, &TrimConfig::default())?;
/// assert!(result.stats.processed_points <= result.stats.original_points);
/// assert_eq!(result.processed.first(), track.first());
/// assert_eq!(result.processed.last(), track.last());
/// # Ok::<(), thrim_core::TrimError>(())
/// ```
pub fn trim(track: &Track, config: &TrimConfig) -> Result<TrimResult, TrimError> {
    validate_config(config)?;

    if track.is_empty() {
        return Ok(TrimResult {
            processed: Track::new(vec![]),
            stats: TrimStats {
                original_points: 0,
                processed_points: 0,
                original_length_mm: 0.0,
                processed_length_mm: 0.0,
                top_deviations: vec![],
            },
        });
    }

    // 1. Reduce.
    let reduced = if config.use_simplifier {
        simplify::simplify(track, config.epsilon, config.max_deviation)
    } else {
        filter::threshold_filter(track, config.threshold_percent, config.diameter)
    };

    // 2. Restore endpoints. Both strategies keep at least one point
    // for non-empty input.
    let mut points = reduced.into_points();
    if let (Some(&first), Some(&last)) = (track.first(), track.last()) {
        if let Some(slot) = points.first_mut() {
            *slot = first;
        }
        if let Some(slot) = points.last_mut() {
            *slot = last;
        }
    }
    let processed = Track::new(points);

    // 3. Statistics.
    let stats = TrimStats {
        original_points: track.len(),
        processed_points: processed.len(),
        original_length_mm: metric::total_length(track),
        processed_length_mm: metric::total_length(&processed),
        top_deviations: deviation::rank_deviations(
            track,
            &processed,
            TrimConfig::DEFAULT_TOP_DEVIATIONS,
        ),
    };

    Ok(TrimResult { processed, stats })
}

/// Reject configurations the pipeline cannot meaningfully run with.
fn validate_config(config: &TrimConfig) -> Result<(), TrimError> {
    if !(config.diameter.is_finite() && config.diameter > 0.0) {
        return Err(TrimError::InvalidConfig(format!(
            "diameter must be positive and finite, got {}",
            config.diameter,
        )));
    }
    if config.epsilon.is_nan() || config.epsilon < 0.0 {
        return Err(TrimError::InvalidConfig(format!(
            "epsilon must be non-negative, got {}",
            config.epsilon,
        )));
    }
    if config.max_deviation.is_nan() || config.max_deviation < 0.0 {
        return Err(TrimError::InvalidConfig(format!(
            "max_deviation must be non-negative, got {}",
            config.max_deviation,
        )));
    }
    if config.threshold_percent.is_nan() || config.threshold_percent < 0.0 {
        return Err(TrimError::InvalidConfig(format!(
            "threshold_percent must be non-negative, got {}",
            config.threshold_percent,
        )));
    }
    Ok(())
}
