//! Theta-rho text parsing (sans-IO).
//!
//! Parses the whitespace-separated `theta rho` line format used by
//! polar sand tables. The parser operates on an in-memory string; file
//! reading belongs to the adapters.
//!
//! Rho scaling by `diameter / 2` happens here, exactly once, so the
//! rest of the core works in millimeters.

use crate::types::{Track, TrackPoint, TrimError};

/// A line the parser rejected and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the input.
    pub line: usize,
    /// What was wrong with it.
    pub message: String,
}

/// A parsed track plus diagnostics for any skipped lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    /// The parsed, scaled, projected track.
    pub track: Track,
    /// Malformed lines that were skipped, in input order.
    pub skipped: Vec<SkippedLine>,
}

/// Parse theta-rho text into a [`Track`], scaling rho to millimeters.
///
/// Blank lines and lines starting with `#` are ignored. Malformed
/// lines (wrong field count, non-numeric or non-finite values) are
/// skipped and reported in [`Parsed::skipped`] rather than aborting
/// the parse; the geometry core never sees them.
///
/// # Errors
///
/// Returns [`TrimError::EmptyInput`] when no line yields a valid
/// sample.
///
/// # Examples
///
/// ```
/// use thrim_core::parse_thr;
///
/// let parsed = parse_thr("# header\n0.0 1.0\n0.1 0.9\n", 33.0)?;
/// assert_eq!(parsed.track.len(), 2);
/// assert!(parsed.skipped.is_empty());
/// // rho 1.0 scaled by diameter/2.
/// assert!((parsed.track.points()[0].rho - 16.5).abs() < 1e-12);
/// # Ok::<(), thrim_core::TrimError>(())
/// ```
pub fn parse_thr(input: &str, diameter: f64) -> Result<Parsed, TrimError> {
    let mut points = Vec::new();
    let mut skipped = Vec::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(theta_str), Some(rho_str), None) = (fields.next(), fields.next(), fields.next())
        else {
            skipped.push(SkippedLine {
                line: idx + 1,
                message: format!("expected 2 fields, got: '{line}'"),
            });
            continue;
        };

        match (theta_str.parse::<f64>(), rho_str.parse::<f64>()) {
            (Ok(theta), Ok(rho)) if theta.is_finite() && rho.is_finite() => {
                points.push(TrackPoint::from_raw(theta, rho, diameter));
            }
            _ => skipped.push(SkippedLine {
                line: idx + 1,
                message: format!("non-numeric sample: '{line}'"),
            }),
        }
    }

    if points.is_empty() {
        return Err(TrimError::EmptyInput);
    }

    Ok(Parsed {
        track: Track::new(points),
        skipped,
    })
}
