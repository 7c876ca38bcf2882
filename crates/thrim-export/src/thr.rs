//! THR (Theta-Rho) serializer.
//!
//! Writes a processed track back into the `.thr` text format used by
//! polar sand tables (Sisyphus, Oasis, Dune Weaver, and DIY polar
//! builds): one `theta rho` pair per line, space-separated, with
//! `#`-prefixed metadata comment lines at the top that table firmware
//! ignores.
//!
//! Values are written in processed units — theta in continuous radians
//! and rho in millimeters (already scaled by `diameter / 2` at parse
//! time) — at 5 decimal places, the precision convention established
//! by [Sandify](https://sandify.org/).
//!
//! This is a pure function with no I/O — it returns a `String`.

use std::fmt::Write;

use thrim_core::Track;

/// Metadata to embed as `#`-prefixed comment lines at the top of the
/// `.thr` file.
///
/// All fields are optional. When present, the corresponding comment
/// line is emitted. Parsers should skip any line beginning with `#`.
#[derive(Debug, Clone, Default)]
pub struct ThrMetadata<'a> {
    /// Source file name — emitted as `# Source: <name>`.
    pub title: Option<&'a str>,

    /// Human-readable trim parameters — emitted as a `#` comment.
    pub description: Option<&'a str>,

    /// Full `TrimConfig` JSON — emitted as `# Config: <json>`.
    ///
    /// Allows re-running with the exact same settings.
    pub config_json: Option<&'a str>,
}

/// Serialize a track into THR (Theta-Rho) text.
///
/// # Examples
///
/// ```
/// use thrim_core::{Track, TrackPoint};
/// use thrim_export::thr::{ThrMetadata, to_thr};
///
/// let track = Track::new(vec![
///     TrackPoint::from_polar(0.0, 16.5),
///     TrackPoint::from_polar(0.5, 16.5),
/// ]);
/// let thr = to_thr(&track, &ThrMetadata::default());
/// assert!(thr.starts_with("# thrim\n"));
/// assert!(thr.contains("0.00000 16.50000"));
/// ```
#[must_use]
pub fn to_thr(track: &Track, metadata: &ThrMetadata<'_>) -> String {
    let mut out = String::new();

    // --- Metadata header ---
    let _ = writeln!(out, "# thrim");
    if let Some(title) = metadata.title {
        for line in title.lines() {
            let _ = writeln!(out, "# Source: {line}");
        }
    }
    if let Some(description) = metadata.description {
        for line in description.lines() {
            let _ = writeln!(out, "# {line}");
        }
    }
    if let Some(config_json) = metadata.config_json {
        for line in config_json.lines() {
            let _ = writeln!(out, "# Config: {line}");
        }
    }

    // --- Theta-Rho data ---
    for p in track.points() {
        let _ = writeln!(out, "{:.5} {:.5}", p.theta, p.rho);
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use thrim_core::TrackPoint;

    use super::*;

    fn track(samples: &[(f64, f64)]) -> Track {
        Track::new(
            samples
                .iter()
                .map(|&(theta, rho)| TrackPoint::from_polar(theta, rho))
                .collect(),
        )
    }

    /// Parse theta-rho pairs from THR output (skipping comments).
    fn parse_pairs(thr: &str) -> Vec<(f64, f64)> {
        thr.lines()
            .filter(|line| !line.starts_with('#'))
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let mut parts = line.split_whitespace();
                let theta: f64 = parts.next().unwrap().parse().unwrap();
                let rho: f64 = parts.next().unwrap().parse().unwrap();
                (theta, rho)
            })
            .collect()
    }

    #[test]
    fn header_always_contains_thrim_identifier() {
        let thr = to_thr(&track(&[]), &ThrMetadata::default());
        assert!(thr.starts_with("# thrim\n"));
    }

    #[test]
    fn metadata_emitted_in_order() {
        let meta = ThrMetadata {
            title: Some("spiral.thr"),
            description: Some("epsilon=0.001"),
            config_json: Some(r#"{"diameter":33.0}"#),
        };
        let thr = to_thr(&track(&[]), &meta);
        let ident = thr.find("# thrim").unwrap();
        let source = thr.find("# Source: spiral.thr").unwrap();
        let desc = thr.find("# epsilon=0.001").unwrap();
        let config = thr.find("# Config: {\"diameter\":33.0}").unwrap();
        assert!(ident < source);
        assert!(source < desc);
        assert!(desc < config);
    }

    #[test]
    fn empty_track_produces_header_only() {
        let thr = to_thr(&track(&[]), &ThrMetadata::default());
        assert!(parse_pairs(&thr).is_empty());
    }

    #[test]
    fn pairs_round_trip_at_five_decimals() {
        let thr = to_thr(
            &track(&[(0.123_456_789, 16.5), (1.0, 0.987_654_321)]),
            &ThrMetadata::default(),
        );
        let pairs = parse_pairs(&thr);
        assert_eq!(pairs.len(), 2);
        assert!((pairs[0].0 - 0.123_46).abs() < 1e-9);
        assert!((pairs[1].1 - 0.987_65).abs() < 1e-9);
    }

    #[test]
    fn output_has_five_decimal_places() {
        let thr = to_thr(&track(&[(0.5, 12.0)]), &ThrMetadata::default());
        let data_lines: Vec<&str> = thr
            .lines()
            .filter(|l| !l.starts_with('#') && !l.trim().is_empty())
            .collect();
        for line in &data_lines {
            let parts: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(parts.len(), 2);
            for part in parts {
                let dot = part.find('.').unwrap();
                assert_eq!(part[dot + 1..].len(), 5, "expected 5 decimals in {part}");
            }
        }
    }

    #[test]
    fn negative_theta_preserved() {
        // Clockwise tracks accumulate negative theta; no wrapping.
        let thr = to_thr(&track(&[(-6.5, 10.0)]), &ThrMetadata::default());
        let pairs = parse_pairs(&thr);
        assert!((pairs[0].0 - (-6.5)).abs() < 1e-9);
    }
}
