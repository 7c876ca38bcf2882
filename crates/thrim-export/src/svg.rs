//! SVG comparison and histogram plots.
//!
//! Pure plot serializers suitable for headless batch runs: a
//! three-panel before/after comparison (original, processed,
//! processed with the top deviations highlighted) and a histogram of
//! adjacent-segment distances.
//!
//! The comparison uses the [`svg`] crate for document construction and
//! path data formatting; the histogram uses manual string formatting.
//! Both are pure functions with no I/O — they return a `String`.

use std::fmt::Write;

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Path, Text as TextElement, Title};
use svg::node::{Text, Value};

use thrim_core::{Deviation, Track, TrackPoint, histogram};

/// Panel width and height in millimetres.
const PANEL_SIZE_MM: f64 = 200.0;
/// Plate circle diameter in millimetres within a panel.
const PLATE_DIAMETER_MM: f64 = 195.0;
/// Sand-colored plate background.
const PLATE_COLOR: &str = "#c9b17f";
/// Track stroke color against the sand background.
const TRACK_COLOR: &str = "#ffffff";
/// Highlight color for deviation markers.
const DEVIATION_COLOR: &str = "#ff3333";
/// Radius of a deviation marker in millimetres.
const MARKER_RADIUS_MM: f64 = 1.5;

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted after the opening `<svg>` tag. Text values are
/// XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct PlotMetadata<'a> {
    /// Document title — emitted as `<title>`.
    ///
    /// Typically the source file name.
    pub title: Option<&'a str>,

    /// Document description — emitted as `<desc>`.
    ///
    /// Typically the trim parameters, so exported plots are
    /// distinguishable.
    pub description: Option<&'a str>,
}

/// Serialize a three-panel comparison plot into an SVG string.
///
/// Panels, left to right: the original track, the processed track, and
/// the processed track with the top deviations marked in red at their
/// original positions. `deviations` carries indices into `original`;
/// `diameter` sets the plate scale so a full-radius track touches the
/// plate edge.
///
/// # Examples
///
/// ```
/// use thrim_core::{Track, TrackPoint};
/// use thrim_export::svg::{PlotMetadata, to_comparison_svg};
///
/// let track = Track::new(vec![
///     TrackPoint::from_polar(0.0, 10.0),
///     TrackPoint::from_polar(1.0, 10.0),
/// ]);
/// let svg = to_comparison_svg(&track, &track, &[], 33.0, &PlotMetadata::default());
/// assert!(svg.contains("Original (2 points)"));
/// ```
#[must_use]
pub fn to_comparison_svg(
    original: &Track,
    processed: &Track,
    deviations: &[Deviation],
    diameter: f64,
    metadata: &PlotMetadata<'_>,
) -> String {
    let width = 3.0 * PANEL_SIZE_MM;
    let mut doc = Document::new()
        .set("width", format!("{width}mm"))
        .set("height", format!("{PANEL_SIZE_MM}mm"))
        .set("viewBox", format!("0 0 {width} {PANEL_SIZE_MM}"))
        .set("preserveAspectRatio", "xMidYMid meet");

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    // Data millimeters -> panel millimeters, so a full-radius point
    // lands on the plate circle. A non-positive diameter cannot occur
    // through `TrimConfig` validation, but degrade to unit scale
    // rather than dividing by zero.
    let scale = if diameter > 0.0 {
        PLATE_DIAMETER_MM / diameter
    } else {
        1.0
    };

    let cy = PANEL_SIZE_MM / 2.0;
    let panels = [
        (0, original, format!("Original ({} points)", original.len())),
        (1, processed, format!("Processed ({} points)", processed.len())),
        (
            2,
            processed,
            format!("Processed + top {} deviations", deviations.len()),
        ),
    ];

    for (slot, track, label) in panels {
        let cx = PANEL_SIZE_MM.mul_add(f64::from(slot), PANEL_SIZE_MM / 2.0);

        doc = doc.add(
            Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", PLATE_DIAMETER_MM / 2.0)
                .set("fill", PLATE_COLOR)
                .set("stroke", "#555555")
                .set("stroke-width", 0.5),
        );

        let d = panel_path_data(track, cx, cy, scale);
        if !d.is_empty() {
            doc = doc.add(
                Path::new()
                    .set("d", d)
                    .set("fill", "none")
                    .set("stroke", TRACK_COLOR)
                    .set("stroke-width", 0.3),
            );
        }

        doc = doc.add(
            TextElement::new(label)
                .set("x", cx)
                .set("y", 8.0)
                .set("text-anchor", "middle")
                .set("font-size", 6.0)
                .set("fill", "#000000"),
        );
    }

    // Deviation markers on the third panel, at the original positions.
    let marker_cx_base = 2.0f64.mul_add(PANEL_SIZE_MM, PANEL_SIZE_MM / 2.0);
    for deviation in deviations {
        if let Some(p) = original.points().get(deviation.index) {
            doc = doc.add(
                Circle::new()
                    .set("cx", scale.mul_add(p.x, marker_cx_base))
                    .set("cy", scale.mul_add(-p.y, cy))
                    .set("r", MARKER_RADIUS_MM)
                    .set("fill", DEVIATION_COLOR),
            );
        }
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

/// Build a panel-local SVG path `d` string from a track.
///
/// Returns an empty string for tracks with fewer than 2 points. The Y
/// axis is flipped at this boundary: track space is +Y-up, SVG is
/// +Y-down.
fn panel_path_data(track: &Track, cx: f64, cy: f64, scale: f64) -> String {
    let points = track.points();
    if points.len() < 2 {
        return String::new();
    }

    let tx = |p: &TrackPoint| (scale.mul_add(p.x, cx), scale.mul_add(-p.y, cy));

    let mut data = Data::new().move_to(tx(&points[0]));
    for p in &points[1..] {
        data = data.line_to(tx(p));
    }
    String::from(Value::from(data))
}

// ---------------------------------------------------------------------------
// Histogram (manual string formatting)
// ---------------------------------------------------------------------------

/// Histogram document width in user units.
const HIST_WIDTH: f64 = 400.0;
/// Histogram document height in user units.
const HIST_HEIGHT: f64 = 220.0;
/// Margin around the plot area.
const HIST_MARGIN: f64 = 20.0;

/// Serialize a histogram of adjacent-segment distances into an SVG
/// string.
///
/// Distances are binned into `n_buckets` equal-width buckets over the
/// observed range and drawn as a bar chart with min/max axis labels.
/// Empty input (or zero buckets) produces a document with the title
/// and no bars.
#[must_use]
pub fn to_histogram_svg(distances: &[f64], n_buckets: usize, title: &str) -> String {
    let counts = histogram(distances, n_buckets);
    let max_count = counts.iter().copied().max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{HIST_WIDTH}" height="{HIST_HEIGHT}" viewBox="0 0 {HIST_WIDTH} {HIST_HEIGHT}">"#,
    );
    let _ = writeln!(
        out,
        r##"  <rect width="{HIST_WIDTH}" height="{HIST_HEIGHT}" fill="#1a1a1a"/>"##,
    );
    let _ = writeln!(
        out,
        r##"  <text x="{:.1}" y="14" text-anchor="middle" font-size="11" fill="#e8e8e8">{}</text>"##,
        HIST_WIDTH / 2.0,
        xml_escape(title),
    );

    let plot_w = HIST_WIDTH - 2.0 * HIST_MARGIN;
    let plot_h = HIST_HEIGHT - 3.0 * HIST_MARGIN;
    let baseline = HIST_HEIGHT - 2.0 * HIST_MARGIN;

    if max_count > 0 {
        #[allow(clippy::cast_precision_loss)]
        let bar_w = plot_w / counts.len() as f64;
        for (i, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            let h = plot_h * count as f64 / max_count as f64;
            #[allow(clippy::cast_precision_loss)]
            let x = bar_w.mul_add(i as f64, HIST_MARGIN);
            let _ = writeln!(
                out,
                r##"  <rect x="{x:.2}" y="{:.2}" width="{bar_w:.2}" height="{h:.2}" fill="#e8e8e8"/>"##,
                baseline - h,
            );
        }

        let min = distances.iter().copied().fold(f64::INFINITY, f64::min);
        let max = distances.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let _ = writeln!(
            out,
            r##"  <text x="{HIST_MARGIN}" y="{:.1}" font-size="9" fill="#e8e8e8">{min:.3} mm</text>"##,
            baseline + 14.0,
        );
        let _ = writeln!(
            out,
            r##"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="9" fill="#e8e8e8">{max:.3} mm</text>"##,
            HIST_WIDTH - HIST_MARGIN,
            baseline + 14.0,
        );
    }

    let _ = writeln!(out, "</svg>");
    out
}

/// Escape the five XML special characters for safe embedding in
/// element text content.
fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(samples: &[(f64, f64)]) -> Track {
        Track::new(
            samples
                .iter()
                .map(|&(theta, rho)| TrackPoint::from_polar(theta, rho))
                .collect(),
        )
    }

    // --- comparison plot ---

    #[test]
    fn comparison_has_three_panel_titles() {
        let original = track(&[(0.0, 10.0), (0.5, 10.0), (1.0, 10.0)]);
        let processed = track(&[(0.0, 10.0), (1.0, 10.0)]);
        let svg = to_comparison_svg(&original, &processed, &[], 33.0, &PlotMetadata::default());
        assert!(svg.contains("Original (3 points)"));
        assert!(svg.contains("Processed (2 points)"));
        assert!(svg.contains("Processed + top 0 deviations"));
    }

    #[test]
    fn comparison_metadata_emitted() {
        let t = track(&[(0.0, 10.0), (1.0, 10.0)]);
        let metadata = PlotMetadata {
            title: Some("spiral.thr"),
            description: Some("epsilon=0.001"),
        };
        let svg = to_comparison_svg(&t, &t, &[], 33.0, &metadata);
        assert!(svg.contains("<title>spiral.thr</title>"));
        assert!(svg.contains("<desc>epsilon=0.001</desc>"));
    }

    #[test]
    fn comparison_viewbox_spans_three_panels() {
        let t = track(&[(0.0, 10.0), (1.0, 10.0)]);
        let svg = to_comparison_svg(&t, &t, &[], 33.0, &PlotMetadata::default());
        assert!(svg.contains(r#"viewBox="0 0 600 200""#));
    }

    #[test]
    fn deviation_markers_drawn_in_red() {
        let original = track(&[(0.0, 10.0), (0.5, 10.0), (1.0, 10.0)]);
        let processed = track(&[(0.0, 10.0), (1.0, 10.0)]);
        let deviations = [
            Deviation {
                index: 1,
                distance: 4.0,
            },
            Deviation {
                index: 2,
                distance: 1.0,
            },
        ];
        let svg = to_comparison_svg(
            &original,
            &processed,
            &deviations,
            33.0,
            &PlotMetadata::default(),
        );
        assert_eq!(svg.matches(DEVIATION_COLOR).count(), 2);
    }

    #[test]
    fn out_of_range_deviation_index_skipped() {
        let t = track(&[(0.0, 10.0), (1.0, 10.0)]);
        let deviations = [Deviation {
            index: 99,
            distance: 1.0,
        }];
        let svg = to_comparison_svg(&t, &t, &deviations, 33.0, &PlotMetadata::default());
        assert_eq!(svg.matches(DEVIATION_COLOR).count(), 0);
    }

    #[test]
    fn single_point_tracks_have_no_path() {
        let t = track(&[(0.0, 10.0)]);
        let svg = to_comparison_svg(&t, &t, &[], 33.0, &PlotMetadata::default());
        assert!(!svg.contains("<path"));
    }

    // --- histogram ---

    #[test]
    fn histogram_draws_bars_for_nonzero_buckets() {
        let svg = to_histogram_svg(&[0.0, 0.1, 0.9, 1.0], 2, "Path lengths");
        // Background rect + two bars.
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("Path lengths"));
    }

    #[test]
    fn histogram_empty_input_has_only_background() {
        let svg = to_histogram_svg(&[], 10, "empty");
        assert_eq!(svg.matches("<rect").count(), 1);
    }

    #[test]
    fn histogram_labels_min_and_max() {
        let svg = to_histogram_svg(&[0.25, 0.5, 1.75], 4, "d");
        assert!(svg.contains("0.250 mm"));
        assert!(svg.contains("1.750 mm"));
    }

    #[test]
    fn histogram_title_is_escaped() {
        let svg = to_histogram_svg(&[1.0], 1, "a<b");
        assert!(svg.contains("a&lt;b"));
    }
}
