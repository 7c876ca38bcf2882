//! Shared types for the thrim path trimming core.

use serde::{Deserialize, Serialize};

/// A raw polar sample: angle in radians, radius.
///
/// The radius unit depends on context: raw table files carry a
/// normalized rho, while everything downstream of parsing works in
/// millimeters (rho pre-scaled by `diameter / 2`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    /// Angle in radians. Accumulates continuously along a track; does
    /// not wrap at 2π.
    pub theta: f64,
    /// Radius from the table center.
    pub rho: f64,
}

impl PolarPoint {
    /// Create a new polar point.
    #[must_use]
    pub const fn new(theta: f64, rho: f64) -> Self {
        Self { theta, rho }
    }
}

/// A 2D point in table coordinates (millimeters, origin at the center).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position in millimeters.
    pub x: f64,
    /// Vertical position in millimeters.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// A polar sample with its Cartesian projection cached.
///
/// The projection is derived once, when the sample is created, and is
/// immutable thereafter. The polar pair is retained alongside it
/// because serialization and reporting need theta/rho while the
/// geometry routines need x/y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Angle in radians.
    pub theta: f64,
    /// Radius in millimeters (already scaled by `diameter / 2`).
    pub rho: f64,
    /// Cartesian projection, `rho * cos(theta)`.
    pub x: f64,
    /// Cartesian projection, `rho * sin(theta)`.
    pub y: f64,
}

impl TrackPoint {
    /// Create a track point from an already-scaled polar sample.
    #[must_use]
    pub fn from_polar(theta: f64, rho: f64) -> Self {
        Self {
            theta,
            rho,
            x: rho * theta.cos(),
            y: rho * theta.sin(),
        }
    }

    /// Create a track point from a raw file sample, scaling the
    /// normalized rho to millimeters.
    ///
    /// This is the single place where `diameter / 2` scaling is
    /// applied; all downstream computation operates on the result.
    #[must_use]
    pub fn from_raw(theta: f64, raw_rho: f64, diameter: f64) -> Self {
        Self::from_polar(theta, raw_rho * diameter / 2.0)
    }

    /// The polar pair of this sample.
    #[must_use]
    pub const fn polar(&self) -> PolarPoint {
        PolarPoint::new(self.theta, self.rho)
    }

    /// The Cartesian projection of this sample.
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// An ordered, index-stable sequence of track points forming one
/// traced path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track(Vec<TrackPoint>);

impl Track {
    /// Create a new track from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<TrackPoint>) -> Self {
        Self(points)
    }

    /// Returns `true` if the track has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the track.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&TrackPoint> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&TrackPoint> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[TrackPoint] {
        &self.0
    }

    /// Consumes the track and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<TrackPoint> {
        self.0
    }
}

/// How far a processed point ended up from its original counterpart.
///
/// Records are paired positionally by index; see
/// [`rank_deviations`](crate::deviation::rank_deviations) for the
/// pairing caveat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    /// Index into the original track.
    pub index: usize,
    /// Euclidean distance between the paired points, in millimeters.
    pub distance: f64,
}

/// Configuration for the trim pipeline.
///
/// All parameters have sensible defaults. The `DEFAULT_*` consts
/// exist so the CLI can bind its flag defaults to them and the two
/// cannot silently diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimConfig {
    /// Threshold for the adjacent-distance filter, as a percentage of
    /// the table diameter. Only used when `use_simplifier` is `false`.
    pub threshold_percent: f64,

    /// Physical table diameter in millimeters. Raw rho values are
    /// scaled by `diameter / 2` at parse time.
    pub diameter: f64,

    /// Minimum perpendicular deviation (mm) that justifies keeping a
    /// point during simplification. Larger values remove more points.
    pub epsilon: f64,

    /// Cap on the deviation the simplifier will tolerate when deciding
    /// whether to refine a span. Spans containing a point further
    /// off-chord than this collapse outright.
    pub max_deviation: f64,

    /// Choose the Douglas-Peucker simplifier (`true`) or the
    /// adjacent-distance threshold filter (`false`).
    pub use_simplifier: bool,
}

impl TrimConfig {
    /// Default threshold, % of diameter.
    pub const DEFAULT_THRESHOLD_PERCENT: f64 = 0.5;
    /// Default table diameter in millimeters.
    pub const DEFAULT_DIAMETER: f64 = 33.0;
    /// Default simplification epsilon in millimeters.
    pub const DEFAULT_EPSILON: f64 = 0.001;
    /// Default deviation cap (uncapped).
    pub const DEFAULT_MAX_DEVIATION: f64 = f64::INFINITY;
    /// Default strategy selection.
    pub const DEFAULT_USE_SIMPLIFIER: bool = true;
    /// How many deviation records [`trim`](crate::trim) keeps.
    pub const DEFAULT_TOP_DEVIATIONS: usize = 10;
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            threshold_percent: Self::DEFAULT_THRESHOLD_PERCENT,
            diameter: Self::DEFAULT_DIAMETER,
            epsilon: Self::DEFAULT_EPSILON,
            max_deviation: Self::DEFAULT_MAX_DEVIATION,
            use_simplifier: Self::DEFAULT_USE_SIMPLIFIER,
        }
    }
}

/// Before/after summary statistics for one processed track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimStats {
    /// Point count of the original track.
    pub original_points: usize,
    /// Point count of the processed track.
    pub processed_points: usize,
    /// Total path length of the original track, in millimeters.
    pub original_length_mm: f64,
    /// Total path length of the processed track, in millimeters.
    pub processed_length_mm: f64,
    /// Largest positional deviations, descending.
    pub top_deviations: Vec<Deviation>,
}

impl TrimStats {
    /// One-line human-readable summary, as printed per processed file.
    #[must_use]
    pub fn report(&self, name: &str) -> String {
        format!(
            "{name}: original points: {}, processed points: {}, \
             original length: {:.2} mm, processed length: {:.2} mm",
            self.original_points,
            self.processed_points,
            self.original_length_mm,
            self.processed_length_mm,
        )
    }
}

/// Result of running the trim pipeline on one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimResult {
    /// The reduced track, with the original endpoints restored.
    pub processed: Track,
    /// Before/after summary statistics.
    pub stats: TrimStats,
}

/// Errors that can occur while preparing or trimming a track.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrimError {
    /// The input contained no usable samples.
    #[error("input contains no valid theta-rho samples")]
    EmptyInput,

    /// Trim configuration is invalid.
    #[error("invalid trim configuration: {0}")]
    InvalidConfig(String),
}
