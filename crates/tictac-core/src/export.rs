//! Spreadsheet export
//!
//! Writes one CSV table per profile: trigger percentage, rendered voltage,
//! and the knob values that produced it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::model::{simulate_mode, CurveMode};
use crate::params::{Knob, ParameterVector};
use crate::profiles::ProfileSet;

/// Errors that can occur while exporting curves
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing a sheet failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The profile could not be simulated
    #[error("Cannot render profile: {0}")]
    Engine(#[from] EngineError),
}

/// Write one profile's curve as CSV.
///
/// Voltages are the natural curve scaled by `params.max_voltage`, rounded
/// to centivolts.
pub fn write_sheet<W: Write>(
    writer: W,
    params: &ParameterVector,
    use_post_curve_delivery: bool,
    config: &EngineConfig,
) -> Result<(), ExportError> {
    let curve = simulate_mode(
        params,
        use_post_curve_delivery,
        CurveMode::Scaled {
            max_voltage: params.max_voltage,
        },
        config,
    )?;
    let mut writer = BufWriter::new(writer);

    write!(writer, "Trigger,Voltage")?;
    for knob in Knob::ALL {
        write!(writer, ",{}", knob.code())?;
    }
    writeln!(writer, ",Pot")?;

    let knobs = params.knobs();
    for (position, volts) in curve.points() {
        write!(writer, "{}%,{:.2}", position, volts)?;
        for value in knobs {
            write!(writer, ",{}", value)?;
        }
        writeln!(writer, ",{}", params.pot_value)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write every visible profile to `<dir>/<label>.csv`.
///
/// Returns the written paths in profile order.
pub fn export_profiles<P: AsRef<Path>>(
    dir: P,
    profiles: &ProfileSet,
    config: &EngineConfig,
) -> Result<Vec<PathBuf>, ExportError> {
    let dir = dir.as_ref();
    let mut written = Vec::new();
    for (index, profile) in profiles.visible() {
        let path = dir.join(format!("{}.csv", file_stem(&profile.label(index))));
        let file = File::create(&path)?;
        write_sheet(file, &profile.params, true, config)?;
        written.push(path);
    }
    tracing::debug!(
        "Exported {} profile sheets to {}",
        written.len(),
        dir.display()
    );
    Ok(written)
}

fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
