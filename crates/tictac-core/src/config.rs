//! Engine configuration
//!
//! Every tunable of the engine lives here: knob limits, the voltage domain,
//! overflow tolerance, ranking depth, and the coarse search grid. The whole
//! structure round-trips through JSON so a front end can persist it next to
//! its own settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

use crate::error::{EngineError, EngineResult};
use crate::params::Knob;

/// Number of samples in every response curve (trigger pull 0..=100%)
pub const SAMPLE_COUNT: usize = 101;

/// Errors that can occur while loading or saving a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid configuration document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The tunables parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] EngineError),
}

/// Candidate values tried for each knob during inverse search.
///
/// Deliberately coarser than the full knob range to bound the search cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridValues {
    /// P4 values
    pub power: Vec<u8>,
    /// P5 values
    pub acceleration: Vec<u8>,
    /// P7 values
    pub power_zone: Vec<u8>,
    /// P8 values
    pub post_curve: Vec<u8>,
    /// P10 values (1 or 2)
    pub multifunction: Vec<u8>,
    /// P11 values
    pub brake_anticipation: Vec<u8>,
    /// P14 values
    pub brake_entry_speed: Vec<u8>,
    /// P15 values
    pub minimum_brake: Vec<u8>,
    /// P16 values
    pub sensitivity: Vec<u8>,
    /// Main pot readings
    pub pot_value: Vec<u8>,
}

impl Default for GridValues {
    fn default() -> Self {
        Self {
            power: vec![4, 7, 10, 13],
            acceleration: vec![1, 8, 15],
            power_zone: vec![1, 8, 15],
            post_curve: vec![1, 8, 15],
            multifunction: vec![1, 2],
            brake_anticipation: vec![1, 2],
            brake_entry_speed: vec![1, 8, 15],
            minimum_brake: vec![1, 8, 15],
            sensitivity: vec![1, 8, 15],
            pot_value: vec![15],
        }
    }
}

impl GridValues {
    /// Values tried for a knob
    pub fn values(&self, knob: Knob) -> &[u8] {
        match knob {
            Knob::Power => &self.power,
            Knob::Acceleration => &self.acceleration,
            Knob::PowerZone => &self.power_zone,
            Knob::PostCurve => &self.post_curve,
            Knob::Multifunction => &self.multifunction,
            Knob::BrakeAnticipation => &self.brake_anticipation,
            Knob::BrakeEntrySpeed => &self.brake_entry_speed,
            Knob::MinimumBrake => &self.minimum_brake,
            Knob::Sensitivity => &self.sensitivity,
        }
    }

    /// Number of knob/pot combinations (excluding the voltage sweep)
    pub fn combinations(&self) -> usize {
        Knob::ALL
            .iter()
            .map(|&knob| self.values(knob).len())
            .product::<usize>()
            * self.pot_value.len()
    }
}

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lowest value of a regular knob
    pub knob_min: u8,
    /// Highest value of a regular knob
    pub knob_max: u8,
    /// Lowest value of the multifunction (brake/voltage) knob
    pub multifunction_min: u8,
    /// Highest value of the multifunction (brake/voltage) knob
    pub multifunction_max: u8,
    /// Lowest allowed voltage
    pub voltage_min: f64,
    /// Highest allowed voltage
    pub voltage_max: f64,
    /// Volts a sample may exceed its ceiling before it counts as overflow
    pub overflow_tolerance: f64,
    /// Number of candidates returned by a search
    pub top_k: usize,
    /// Step of the swept target voltage during search
    pub voltage_step: f64,
    /// Apply post-curve delivery when simulating search candidates
    pub use_post_curve_delivery: bool,
    /// Search worker threads (None = available parallelism)
    pub workers: Option<usize>,
    /// Candidates scored between cancellation checks
    pub batch_size: usize,
    /// Per-knob candidate values
    pub grid: GridValues,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            knob_min: 1,
            knob_max: 15,
            multifunction_min: 1,
            multifunction_max: 2,
            voltage_min: 0.0,
            voltage_max: 16.0,
            overflow_tolerance: 0.05,
            top_k: 5,
            voltage_step: 0.5,
            use_post_curve_delivery: true,
            workers: None,
            batch_size: 1024,
            grid: GridValues::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        if let Err(e) = config.validate() {
            tracing::warn!(
                "Rejecting engine config {}: {e}",
                path.as_ref().display()
            );
            return Err(e.into());
        }
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Allowed values of a knob
    pub fn knob_range(&self, knob: Knob) -> RangeInclusive<u8> {
        match knob {
            Knob::Multifunction => self.multifunction_min..=self.multifunction_max,
            _ => self.knob_min..=self.knob_max,
        }
    }

    /// Allowed voltages
    pub fn voltage_range(&self) -> RangeInclusive<f64> {
        self.voltage_min..=self.voltage_max
    }

    /// Worker threads to use for a search
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }

    /// Check that a value lies in a knob's range
    pub fn check_knob(&self, knob: Knob, value: u8) -> EngineResult<()> {
        check_knob_value(knob.field_name(), value, self.knob_range(knob))
    }

    /// Check that a value is a valid pot reading
    pub fn check_pot(&self, value: u8) -> EngineResult<()> {
        check_knob_value("pot_value", value, self.knob_min..=self.knob_max)
    }

    /// Check that a voltage lies in the voltage domain
    pub fn check_voltage(&self, field: &'static str, value: f64) -> EngineResult<()> {
        if value.is_finite() && self.voltage_range().contains(&value) {
            Ok(())
        } else {
            Err(EngineError::InvalidParameter {
                field,
                value,
                min: self.voltage_min,
                max: self.voltage_max,
            })
        }
    }

    /// Validate every tunable
    pub fn validate(&self) -> EngineResult<()> {
        if self.knob_min == 0 || self.knob_min > self.knob_max {
            return Err(EngineError::InvalidRange {
                min: f64::from(self.knob_min),
                max: f64::from(self.knob_max),
            });
        }
        if self.multifunction_min == 0 || self.multifunction_min > self.multifunction_max {
            return Err(EngineError::InvalidRange {
                min: f64::from(self.multifunction_min),
                max: f64::from(self.multifunction_max),
            });
        }
        if !self.voltage_min.is_finite()
            || !self.voltage_max.is_finite()
            || self.voltage_min > self.voltage_max
        {
            return Err(EngineError::InvalidRange {
                min: self.voltage_min,
                max: self.voltage_max,
            });
        }
        if !self.overflow_tolerance.is_finite() || self.overflow_tolerance < 0.0 {
            return Err(EngineError::InvalidParameter {
                field: "overflow_tolerance",
                value: self.overflow_tolerance,
                min: 0.0,
                max: self.voltage_max,
            });
        }
        if !self.voltage_step.is_finite() || self.voltage_step <= 0.0 {
            return Err(EngineError::InvalidParameter {
                field: "voltage_step",
                value: self.voltage_step,
                min: f64::MIN_POSITIVE,
                max: self.voltage_max,
            });
        }
        if self.top_k == 0 {
            return Err(EngineError::InvalidParameter {
                field: "top_k",
                value: 0.0,
                min: 1.0,
                max: f64::MAX,
            });
        }
        if self.batch_size == 0 {
            return Err(EngineError::InvalidParameter {
                field: "batch_size",
                value: 0.0,
                min: 1.0,
                max: f64::MAX,
            });
        }
        if self.workers == Some(0) {
            return Err(EngineError::InvalidParameter {
                field: "workers",
                value: 0.0,
                min: 1.0,
                max: f64::MAX,
            });
        }
        self.validate_grid()
    }

    /// Validate the search grid against the knob limits
    pub fn validate_grid(&self) -> EngineResult<()> {
        for knob in Knob::ALL {
            let values = self.grid.values(knob);
            if values.is_empty() {
                return Err(EngineError::EmptyGrid {
                    field: knob.field_name(),
                });
            }
            for &value in values {
                self.check_knob(knob, value)?;
            }
        }
        if self.grid.pot_value.is_empty() {
            return Err(EngineError::EmptyGrid { field: "pot_value" });
        }
        for &value in &self.grid.pot_value {
            self.check_pot(value)?;
        }
        Ok(())
    }
}

fn check_knob_value(field: &'static str, value: u8, range: RangeInclusive<u8>) -> EngineResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidParameter {
            field,
            value: f64::from(value),
            min: f64::from(*range.start()),
            max: f64::from(*range.end()),
        })
    }
}
