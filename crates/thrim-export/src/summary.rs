//! CSV batch summary serializer.
//!
//! One row per processed file: point counts, path lengths, and the
//! largest positional deviation. This is a pure function returning a
//! `String`; writing the file belongs to the CLI.

use std::fmt::Write;

use thrim_core::TrimStats;

/// Summary data for one processed file.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryEntry {
    /// File name (or relative path) of the processed input.
    pub name: String,
    /// Trim statistics for that file.
    pub stats: TrimStats,
}

/// Serialize batch summary entries into CSV text.
///
/// The first line is a header; numeric fields use 3-decimal fixed
/// formatting. Names containing commas, quotes, or newlines are quoted
/// with doubled inner quotes.
///
/// # Examples
///
/// ```
/// use thrim_core::TrimStats;
/// use thrim_export::summary::{SummaryEntry, to_summary_csv};
///
/// let entries = vec![SummaryEntry {
///     name: "spiral.thr".to_string(),
///     stats: TrimStats {
///         original_points: 100,
///         processed_points: 42,
///         original_length_mm: 812.5,
///         processed_length_mm: 810.25,
///         top_deviations: vec![],
///     },
/// }];
/// let csv = to_summary_csv(&entries);
/// assert!(csv.starts_with("file,original_points,"));
/// assert!(csv.contains("spiral.thr,100,42,812.500,810.250,0.000"));
/// ```
#[must_use]
pub fn to_summary_csv(entries: &[SummaryEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "file,original_points,processed_points,original_length_mm,processed_length_mm,max_deviation_mm",
    );

    for entry in entries {
        let max_deviation = entry
            .stats
            .top_deviations
            .first()
            .map_or(0.0, |d| d.distance);
        let _ = writeln!(
            out,
            "{},{},{},{:.3},{:.3},{:.3}",
            csv_field(&entry.name),
            entry.stats.original_points,
            entry.stats.processed_points,
            entry.stats.original_length_mm,
            entry.stats.processed_length_mm,
            max_deviation,
        );
    }

    out
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use thrim_core::Deviation;

    use super::*;

    fn stats() -> TrimStats {
        TrimStats {
            original_points: 10,
            processed_points: 4,
            original_length_mm: 25.0,
            processed_length_mm: 24.5,
            top_deviations: vec![
                Deviation {
                    index: 3,
                    distance: 0.75,
                },
                Deviation {
                    index: 7,
                    distance: 0.25,
                },
            ],
        }
    }

    #[test]
    fn header_then_one_row_per_entry() {
        let entries = vec![
            SummaryEntry {
                name: "a.thr".to_string(),
                stats: stats(),
            },
            SummaryEntry {
                name: "b.thr".to_string(),
                stats: stats(),
            },
        ];
        let csv = to_summary_csv(&entries);
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.lines().next().is_some_and(|h| h.starts_with("file,")));
    }

    #[test]
    fn row_uses_largest_deviation() {
        let entries = vec![SummaryEntry {
            name: "a.thr".to_string(),
            stats: stats(),
        }];
        let csv = to_summary_csv(&entries);
        assert!(csv.contains("a.thr,10,4,25.000,24.500,0.750"));
    }

    #[test]
    fn empty_deviations_report_zero() {
        let mut s = stats();
        s.top_deviations.clear();
        let entries = vec![SummaryEntry {
            name: "a.thr".to_string(),
            stats: s,
        }];
        let csv = to_summary_csv(&entries);
        assert!(csv.contains("a.thr,10,4,25.000,24.500,0.000"));
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let entries = vec![SummaryEntry {
            name: "weird, name.thr".to_string(),
            stats: stats(),
        }];
        let csv = to_summary_csv(&entries);
        assert!(csv.contains("\"weird, name.thr\","));
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(csv_field("a\"b"), "\"a\"\"b\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn no_entries_is_header_only() {
        let csv = to_summary_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
    }
}
