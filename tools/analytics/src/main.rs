//! Offline dashboard report: runs the full analytics pipeline over one or
//! more catalog dumps and writes the report JSON the dashboard loads.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use astrohub_core::pipeline::Distributions;
use astrohub_core::temporal::Timeline;
use astrohub_core::{run, AnalyticsConfig, AnalyticsReport};
use clap::Parser;
use rayon::prelude::*;
use serde_json::Value;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "analytics", about = "Build the exoplanet dashboard report from catalog dumps")]
struct Args {
    /// Catalog JSON files, each an array of raw records. Repeatable.
    #[arg(short, long, required = true)]
    input: Vec<String>,

    /// Analytics configuration JSON (bins, scorer, metrics, year window).
    #[arg(short, long)]
    config: Option<String>,

    /// Output path for the report JSON.
    #[arg(short, long, default_value = "data/report.json")]
    output: String,

    /// Print per-record warnings from the pipeline.
    #[arg(short, long)]
    verbose: bool,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn log_level(verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Error
    }
}

/// `RUST_LOG` still applies on top of the `--verbose` level.
fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(log_level(verbose))
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn load_rows(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    match serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))? {
        Value::Array(rows) => Ok(rows),
        _ => bail!("{}: expected a JSON array of records", path.display()),
    }
}

fn load_config(path: Option<&str>) -> Result<AnalyticsConfig> {
    let Some(path) = path else {
        return Ok(AnalyticsConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("invalid analytics config in {path}"))
}

// ── Tables ────────────────────────────────────────────────────────────────────

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{x:.1}"))
}

fn timeline_table(t: &Timeline) -> String {
    let mut out = format!(
        "{:<6} {:>6} {:>8} {:>9} {:>9} {:>7}\n",
        "Year", "N", "Total", "MeanScore", "MeanRad", "High%"
    );
    out.push_str(&"-".repeat(50));
    out.push('\n');
    for (p, c) in t.yearly.iter().zip(&t.cumulative) {
        out.push_str(&format!(
            "{:<6} {:>6} {:>8} {:>9} {:>9} {:>7.1}\n",
            p.year,
            p.count,
            c.cumulative,
            fmt_opt(p.mean_score),
            fmt_opt(p.mean_radius),
            p.high_score_ratio
        ));
    }
    out
}

fn distribution_table(d: &Distributions) -> String {
    let mut out = String::new();
    for (title, buckets) in [
        ("Distance", &d.distance_ly),
        ("Radius", &d.radius),
        ("Mass", &d.mass),
        ("Orbital period", &d.orbital_period),
        ("Score", &d.score),
    ] {
        out.push_str(&format!("{title}\n"));
        if buckets.is_empty() {
            out.push_str("  (no data)\n");
        }
        for b in buckets {
            out.push_str(&format!("  {:<14} {:>6}\n", b.label, b.count));
        }
    }
    out
}

fn summary_line(report: &AnalyticsReport) -> String {
    let bands = &report.categories.score_bands;
    let mean = fmt_opt(report.summary.map(|s| s.mean));
    format!(
        "{} records ({} rejected): mean score {mean}, {} high / {} medium / {} low / {} unscored",
        report.records.len(),
        report.rejected.len(),
        bands.high,
        bands.medium,
        bands.low,
        bands.unscored
    )
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let cfg = load_config(args.config.as_deref())?;

    eprintln!("Loading {} catalog file(s) ...", args.input.len());
    let loaded: Vec<Result<Vec<Value>>> =
        args.input.par_iter().map(|p| load_rows(Path::new(p))).collect();
    let mut rows = Vec::new();
    for res in loaded {
        rows.extend(res?);
    }

    eprintln!("Analyzing {} rows ...", rows.len());
    let report = run(&rows, &cfg);
    if !report.rejected.is_empty() {
        eprintln!("{} rows rejected.", report.rejected.len());
    }

    eprintln!("\n{}", timeline_table(&report.timeline));
    eprintln!("{}", distribution_table(&report.distributions));
    for e in report.correlations.iter().filter(|e| e.correlation >= 0.5) {
        eprintln!(
            "  {:?} ~ {:?}: {:.2} {} ({}, n={})",
            e.metric1,
            e.metric2,
            e.correlation,
            e.strength.as_str(),
            e.direction.as_str(),
            e.samples
        );
    }
    eprintln!("{}", summary_line(&report));

    let out_path = Path::new(&args.output);
    if let Some(dir) = out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(out_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("writing {}", out_path.display()))?;
    eprintln!("  -> {}", out_path.display());
    Ok(())
}
