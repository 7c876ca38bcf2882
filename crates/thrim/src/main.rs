//! thrim: batch CLI for trimming theta-rho path files.
//!
//! Processes a single `.thr` file or a directory tree of them:
//! parse -> trim -> write processed files mirroring the input layout,
//! with optional SVG/PNG comparison plots, distance histograms, and a
//! CSV batch summary.
//!
//! # Usage
//!
//! ```text
//! thrim --output-dir trimmed/ [OPTIONS] <INPUT_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use thrim_core::{TrimConfig, parse_thr, rank_deviations, segment_distances, trim};
use thrim_export::{
    PlotMetadata, SummaryEntry, ThrMetadata, to_comparison_svg, to_histogram_svg, to_summary_csv,
    to_thr,
};

/// Trim theta-rho path files for polar sand tables.
///
/// Removes points that contribute little geometric detail while
/// always preserving track endpoints, and reports before/after
/// statistics.
#[derive(Parser)]
#[command(name = "thrim", version)]
struct Cli {
    /// Input .thr file, or a directory to process recursively.
    input_path: PathBuf,

    /// Output directory for processed .thr files (the input layout is
    /// mirrored for directories).
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Threshold for the adjacent-distance filter, % of diameter.
    #[arg(long, default_value_t = TrimConfig::DEFAULT_THRESHOLD_PERCENT)]
    threshold_percent: f64,

    /// Physical table diameter in millimeters.
    #[arg(long, default_value_t = TrimConfig::DEFAULT_DIAMETER)]
    diameter: f64,

    /// Minimum perpendicular deviation (mm) that keeps a point.
    #[arg(long, default_value_t = TrimConfig::DEFAULT_EPSILON)]
    epsilon: f64,

    /// Cap on the deviation tolerated when refining a span.
    #[arg(long, default_value_t = TrimConfig::DEFAULT_MAX_DEVIATION)]
    max_deviation: f64,

    /// Use the adjacent-distance threshold filter instead of the
    /// Douglas-Peucker simplifier.
    #[arg(long)]
    no_simplifier: bool,

    /// Number of buckets for the distance histogram.
    #[arg(long, default_value_t = 200)]
    n_buckets: usize,

    /// Number of top deviations to mark on comparison plots.
    #[arg(long, default_value_t = 10)]
    top_n_deviations: usize,

    /// Write three-panel comparison SVGs into this directory.
    #[arg(long)]
    svg_dir: Option<PathBuf>,

    /// Render three-panel comparison PNGs into this directory.
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Panel size for rendered PNG comparisons, in pixels.
    #[arg(long, default_value_t = 512)]
    panel_px: u32,

    /// Write adjacent-distance histograms (SVG) into this directory.
    #[arg(long)]
    histogram_dir: Option<PathBuf>,

    /// Write a CSV batch summary to this file.
    #[arg(long)]
    summary_csv: Option<PathBuf>,

    /// Print per-file statistics as JSON instead of one-line reports.
    #[arg(long)]
    json: bool,

    /// Full trim config as a JSON string.
    ///
    /// When provided, the individual parameter flags are ignored. The
    /// JSON must be a valid `TrimConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Build a [`TrimConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and
/// the individual parameter flags are ignored. Otherwise, a config is
/// assembled from the flags.
fn config_from_cli(cli: &Cli) -> Result<TrimConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(TrimConfig {
        threshold_percent: cli.threshold_percent,
        diameter: cli.diameter,
        epsilon: cli.epsilon,
        max_deviation: cli.max_deviation,
        use_simplifier: !cli.no_simplifier,
    })
}

/// Human-readable parameter summary for output metadata.
fn trim_description(config: &TrimConfig) -> String {
    if config.use_simplifier {
        format!(
            "douglas-peucker: epsilon={}, max_deviation={}",
            config.epsilon, config.max_deviation,
        )
    } else {
        format!(
            "threshold filter: threshold_percent={}%, diameter={}",
            config.threshold_percent, config.diameter,
        )
    }
}

/// Resolve the input to a base directory and the list of files to
/// process. A directory is walked recursively in sorted order.
fn collect_inputs(input: &Path) -> Result<(PathBuf, Vec<PathBuf>), String> {
    if input.is_file() {
        let base = input.parent().unwrap_or(Path::new("")).to_path_buf();
        return Ok((base, vec![input.to_path_buf()]));
    }
    if input.is_dir() {
        let mut files = Vec::new();
        collect_files(input, &mut files)
            .map_err(|e| format!("Error reading {}: {e}", input.display()))?;
        return Ok((input.to_path_buf(), files));
    }
    Err(format!(
        "{} is neither a file nor a directory",
        input.display(),
    ))
}

/// Recursively collect files under `dir`, depth-first in path order.
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(std::fs::DirEntry::path);
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

/// Create the parent directory of `path` if it does not exist yet.
fn ensure_parent(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Error creating {}: {e}", parent.display()))?;
    }
    Ok(())
}

/// Write `bytes` to `path`, creating parent directories as needed.
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), String> {
    ensure_parent(path)?;
    fs::write(path, bytes).map_err(|e| format!("Error writing {}: {e}", path.display()))
}

/// Process one input file end to end. Returns the summary entry for
/// the batch CSV.
fn process_file(
    path: &Path,
    base_dir: &Path,
    cli: &Cli,
    config: &TrimConfig,
) -> Result<SummaryEntry, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    let parsed = parse_thr(&text, config.diameter)
        .map_err(|e| format!("Error parsing {}: {e}", path.display()))?;
    for skipped in &parsed.skipped {
        eprintln!(
            "{}:{}: skipping line ({})",
            path.display(),
            skipped.line,
            skipped.message,
        );
    }

    let result = trim(&parsed.track, config)
        .map_err(|e| format!("Error trimming {}: {e}", path.display()))?;

    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    let name = relative.display().to_string();
    let description = trim_description(config);
    let config_json = serde_json::to_string(config).ok();

    // Processed .thr output, mirroring the input layout.
    let metadata = ThrMetadata {
        title: Some(&name),
        description: Some(&description),
        config_json: config_json.as_deref(),
    };
    write_output(
        &cli.output_dir.join(relative),
        to_thr(&result.processed, &metadata).as_bytes(),
    )?;

    // Optional plots. The plot marker count is a separate knob from
    // the top-10 ranking kept in the stats.
    let plot_deviations = rank_deviations(&parsed.track, &result.processed, cli.top_n_deviations);

    if let Some(ref dir) = cli.svg_dir {
        let plot_metadata = PlotMetadata {
            title: Some(&name),
            description: Some(&description),
        };
        let svg = to_comparison_svg(
            &parsed.track,
            &result.processed,
            &plot_deviations,
            config.diameter,
            &plot_metadata,
        );
        write_output(&dir.join(relative.with_extension("svg")), svg.as_bytes())?;
    }

    if let Some(ref dir) = cli.png_dir {
        let img = render::render_comparison(
            &parsed.track,
            &result.processed,
            &plot_deviations,
            config.diameter,
            cli.panel_px,
        );
        let png_path = dir.join(relative.with_extension("png"));
        ensure_parent(&png_path)?;
        img.save(&png_path)
            .map_err(|e| format!("Error writing {}: {e}", png_path.display()))?;
    }

    if let Some(ref dir) = cli.histogram_dir {
        let svg = to_histogram_svg(
            &segment_distances(&result.processed),
            cli.n_buckets,
            &format!("Path lengths (mm): {name}"),
        );
        write_output(
            &dir.join(relative.with_extension("hist.svg")),
            svg.as_bytes(),
        )?;
    }

    // Per-file report.
    if cli.json {
        match serde_json::to_string_pretty(&result.stats) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing stats for {name}: {e}"),
        }
    } else {
        println!("{}", result.stats.report(&name));
    }

    Ok(SummaryEntry {
        name,
        stats: result.stats,
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let (base_dir, files) = match collect_inputs(&cli.input_path) {
        Ok(found) => found,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        eprintln!("No files found under {}", cli.input_path.display());
        return ExitCode::FAILURE;
    }

    let mut entries = Vec::with_capacity(files.len());
    let mut failures = 0usize;
    for file in &files {
        match process_file(file, &base_dir, &cli, &config) {
            Ok(entry) => entries.push(entry),
            Err(msg) => {
                eprintln!("{msg}");
                failures += 1;
            }
        }
    }

    if let Some(ref csv_path) = cli.summary_csv {
        if let Err(msg) = write_output(csv_path, to_summary_csv(&entries).as_bytes()) {
            eprintln!("{msg}");
            failures += 1;
        }
    }

    eprintln!("Processed {} file(s), {failures} failure(s)", entries.len());

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    #[test]
    fn flag_defaults_match_config_defaults() {
        let cli = parse_cli(&["thrim", "in.thr", "--output-dir", "out"]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config, TrimConfig::default());
    }

    #[test]
    fn no_simplifier_selects_the_filter() {
        let cli = parse_cli(&["thrim", "in.thr", "-o", "out", "--no-simplifier"]);
        let config = config_from_cli(&cli).unwrap();
        assert!(!config.use_simplifier);
    }

    #[test]
    fn config_json_overrides_flags() {
        let json = r#"{"threshold_percent":2.0,"diameter":40.0,"epsilon":0.5,"max_deviation":3.0,"use_simplifier":false}"#;
        let cli = parse_cli(&[
            "thrim",
            "in.thr",
            "-o",
            "out",
            "--epsilon",
            "9.0",
            "--config-json",
            json,
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert!((config.epsilon - 0.5).abs() < f64::EPSILON);
        assert!((config.diameter - 40.0).abs() < f64::EPSILON);
        assert!(!config.use_simplifier);
    }

    #[test]
    fn bad_config_json_is_an_error() {
        let cli = parse_cli(&["thrim", "in.thr", "-o", "out", "--config-json", "{nope"]);
        assert!(config_from_cli(&cli).is_err());
    }

    #[test]
    fn description_names_the_active_strategy() {
        let simplifier = trim_description(&TrimConfig::default());
        assert!(simplifier.starts_with("douglas-peucker"));

        let filter = trim_description(&TrimConfig {
            use_simplifier: false,
            ..TrimConfig::default()
        });
        assert!(filter.starts_with("threshold filter"));
    }
}
