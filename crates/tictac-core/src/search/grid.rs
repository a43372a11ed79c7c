//! Candidate generation
//!
//! The search never materializes its candidate list: a generator maps an
//! enumeration index to a parameter vector, so workers can split the index
//! space and decode their own slice.

use crate::config::{EngineConfig, GridValues};
use crate::error::{EngineError, EngineResult};
use crate::params::{Knob, ParameterVector};

/// Source of candidate parameter vectors, addressable by index
pub trait CandidateGenerator: Sync {
    /// Number of candidates
    fn len(&self) -> usize;

    /// True when there is nothing to score
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candidate at `index`. The search validates each one before scoring.
    fn candidate(&self, index: usize) -> ParameterVector;
}

/// Cartesian product of the configured knob values, the pot values, and a
/// swept target voltage.
///
/// Enumeration order nests knobs in [`Knob::ALL`] order (power outermost),
/// then the pot value, with the voltage varying fastest.
#[derive(Debug, Clone)]
pub struct CoarseGrid {
    axes: [Vec<u8>; 9],
    pot_values: Vec<u8>,
    voltages: Vec<f64>,
}

impl CoarseGrid {
    /// Build the grid for a voltage range.
    ///
    /// Fails with `InvalidRange` when `min_voltage > max_voltage` or either
    /// bound is outside the voltage domain; bounds are never swapped.
    pub fn new(config: &EngineConfig, min_voltage: f64, max_voltage: f64) -> EngineResult<Self> {
        let domain = config.voltage_range();
        if !min_voltage.is_finite()
            || !max_voltage.is_finite()
            || min_voltage > max_voltage
            || !domain.contains(&min_voltage)
            || !domain.contains(&max_voltage)
        {
            return Err(EngineError::InvalidRange {
                min: min_voltage,
                max: max_voltage,
            });
        }
        config.validate_grid()?;

        let grid: &GridValues = &config.grid;
        Ok(Self {
            axes: Knob::ALL.map(|knob| grid.values(knob).to_vec()),
            pot_values: grid.pot_value.clone(),
            voltages: sweep(min_voltage, max_voltage, config.voltage_step),
        })
    }

    /// Target voltages visited by the sweep
    pub fn voltages(&self) -> &[f64] {
        &self.voltages
    }

    /// Every candidate, in enumeration order
    pub fn generate(&self) -> Vec<ParameterVector> {
        (0..self.len()).map(|i| self.candidate(i)).collect()
    }
}

impl CandidateGenerator for CoarseGrid {
    fn len(&self) -> usize {
        self.axes.iter().map(Vec::len).product::<usize>()
            * self.pot_values.len()
            * self.voltages.len()
    }

    fn candidate(&self, index: usize) -> ParameterVector {
        let mut rest = index;

        let voltage = self.voltages[rest % self.voltages.len()];
        rest /= self.voltages.len();
        let pot_value = self.pot_values[rest % self.pot_values.len()];
        rest /= self.pot_values.len();

        let mut knobs = [0u8; 9];
        for (slot, axis) in knobs.iter_mut().zip(&self.axes).rev() {
            *slot = axis[rest % axis.len()];
            rest /= axis.len();
        }

        ParameterVector::from_knobs(knobs, pot_value, voltage)
    }
}

/// Enumerate every candidate for a voltage range
pub fn generate(
    config: &EngineConfig,
    min_voltage: f64,
    max_voltage: f64,
) -> EngineResult<Vec<ParameterVector>> {
    Ok(CoarseGrid::new(config, min_voltage, max_voltage)?.generate())
}

/// Voltages from `min` to `max` inclusive in `step` increments, rounded to
/// centivolts. A range narrower than one step yields just `min`.
fn sweep(min: f64, max: f64, step: f64) -> Vec<f64> {
    let steps = ((max - min) / step + 1e-9).floor() as usize;
    (0..=steps)
        .map(|i| {
            let v = min + i as f64 * step;
            ((v * 100.0).round() / 100.0).clamp(min, max)
        })
        .collect()
}
