//! Habitability scoring from the command line: one record, a whole catalog
//! file, or the Earth reference.

use std::fs;

use anyhow::{bail, Context, Result};
use astrohub_core::habitability::{evaluate, Factor, Habitability};
use astrohub_core::{normalize_batch, PlanetRecord, ScorerConfig};
use clap::Parser;
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "astrohub-score", about = "Score planets for habitability")]
struct Args {
    /// JSON file holding one raw record.
    #[arg(short, long)]
    input: Option<String>,

    /// JSON file holding an array of raw records.
    #[arg(short, long)]
    batch: Option<String>,

    /// Score the Earth reference body.
    #[arg(long)]
    earth: bool,

    /// Scorer configuration JSON (weights, bands, limits).
    #[arg(short, long)]
    config: Option<String>,

    /// Print scored records as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

fn read_json(path: &str) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

fn load_records(args: &Args) -> Result<Vec<PlanetRecord>> {
    if args.earth {
        return Ok(vec![PlanetRecord::earth()]);
    }
    let raws = if let Some(path) = &args.batch {
        match read_json(path)? {
            Value::Array(rows) => rows,
            _ => bail!("{path}: expected a JSON array of records"),
        }
    } else if let Some(path) = &args.input {
        vec![read_json(path)?]
    } else {
        bail!("no input specified, use --input, --batch or --earth (see --help)");
    };

    let batch = normalize_batch(&raws);
    for r in &batch.rejected {
        eprintln!("Warning: record #{} skipped: {}", r.index, r.reason);
    }
    if batch.records.is_empty() {
        bail!("no usable records");
    }
    Ok(batch.records)
}

fn score_text(h: &Habitability) -> String {
    h.score.map_or_else(|| "-".to_string(), |s| format!("{s:.1}"))
}

fn render(record: &PlanetRecord, h: &Habitability) -> String {
    let mut out = format!("{:<28} {:>6}  {}\n", record.name, score_text(h), h.label.as_str());
    for factor in Factor::ALL {
        if let Some(f) = h.breakdown.get(&factor) {
            out.push_str(&format!(
                "    {:<12} value {:>10.3}  score {:>5.1}  weight {:>5.3}  +{:.1}\n",
                factor.as_str(),
                f.value,
                f.score100,
                f.weight,
                f.contribution
            ));
        }
    }
    if let Some(p) = h.penalty {
        out.push_str(&format!("    stellar activity penalty -{p:.1}\n"));
    }
    if let Some(reason) = &h.exclusion {
        out.push_str(&format!("    excluded: {reason}\n"));
    }
    if let Some(esi) = h.esi {
        out.push_str(&format!("    ESI {esi:.1}\n"));
    }
    out
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg: ScorerConfig = match &args.config {
        Some(path) => serde_json::from_value(read_json(path)?)
            .with_context(|| format!("invalid scorer config in {path}"))?,
        None => ScorerConfig::default(),
    };

    let mut records = load_records(&args)?;
    for record in &mut records {
        record.habitability = Some(evaluate(record, &cfg));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        if let Some(h) = &record.habitability {
            print!("{}", render(record, h));
        }
    }
    if records.len() > 1 {
        let scored = records.iter().filter(|r| r.score().is_some()).count();
        eprintln!("\n{} records, {} scored.", records.len(), scored);
    }
    Ok(())
}
