//! Inverse Search Tool
//!
//! Finds the controller knobs that best reproduce a drawn trigger curve and
//! prints the ranked candidates.
//!
//! Usage:
//!   cargo run --example invert_curve -- [OPTIONS]
//!
//! Options:
//!   --min VOLTS       Lowest max-voltage to sweep (default: 10)
//!   --max VOLTS       Highest max-voltage to sweep (default: 14)
//!   --points LIST     Comma-separated control points in volts
//!                     (default: 15-point linear ramp to 12 V)
//!   --config PATH     Engine config JSON
//!   --top N           Number of candidates to keep
//!
//! Set RUST_LOG=tictac_core=debug for search progress.

use anyhow::{bail, Context, Result};
use std::time::Instant;
use tictac_core::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut min_voltage = 10.0;
    let mut max_voltage = 14.0;
    let mut points: Option<Vec<f64>> = None;
    let mut config_path: Option<String> = None;
    let mut top: Option<usize> = None;

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--min", Some(v)) => min_voltage = v.parse().context("--min expects volts")?,
            ("--max", Some(v)) => max_voltage = v.parse().context("--max expects volts")?,
            ("--points", Some(v)) => {
                let parsed = v
                    .split(',')
                    .map(|p| p.trim().parse::<f64>())
                    .collect::<Result<Vec<_>, _>>()
                    .context("--points expects comma-separated volts")?;
                points = Some(parsed);
            }
            ("--config", Some(v)) => config_path = Some(v.clone()),
            ("--top", Some(v)) => top = Some(v.parse().context("--top expects a count")?),
            ("--help" | "-h", _) => {
                println!("Usage: invert_curve [--min V] [--max V] [--points a,b,...] [--config PATH] [--top N]");
                return Ok(());
            }
            (flag, _) => bail!("Unknown or incomplete option: {}", flag),
        }
        i += 2;
    }

    let mut config = match &config_path {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path))?,
        None => EngineConfig::default(),
    };
    if let Some(k) = top {
        config.top_k = k;
    }

    let target = match points {
        Some(points) => TargetCurve::new(points, &config)?,
        None => TargetCurve::default(),
    };

    println!("=== TICTAC Inverse Search ===");
    println!("Control points: {:?}", target.points());
    println!("Voltage sweep:  {:.2} V - {:.2} V", min_voltage, max_voltage);
    println!();

    let search = InverseSearch::new(config)?;
    let started = Instant::now();
    let result = search.invert(target.points(), min_voltage, max_voltage)?;
    let elapsed = started.elapsed();

    println!(
        "Scored {} candidates in {:.2?}",
        result.evaluated, elapsed
    );
    println!();
    println!(
        "{:>8}  {:>8}  {:>6}  {}",
        "Id", "Error", "Volts", "P4 P5 P7 P8 P10 P11 P14 P15 P16 Pot"
    );
    for candidate in result.iter() {
        let knobs = candidate
            .params
            .knobs()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{:>8}  {:>8.2}  {:>6.2}  {} {}{}",
            candidate.id.to_string(),
            candidate.error,
            candidate.params.max_voltage,
            knobs,
            candidate.params.pot_value,
            if candidate.overflow { "  (overflow)" } else { "" }
        );
    }

    Ok(())
}
