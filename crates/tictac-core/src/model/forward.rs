//! Forward model
//!
//! Maps a [`ParameterVector`] to the controller's output voltage at every
//! trigger-pull percentage. The model is a product of independent factors:
//!
//! - pot sensitivity: `pot_norm ^ exponent`, exponent 2.7 (P16=1) down to 0.5 (P16=15)
//! - power: `P4 / 15`
//! - progressivity: `x ^ (1 / accel)`, accel 1.0 (P5=1) up to 1.1 (P5=15)
//! - post-curve delivery: 0.6 (P8=1) up to 1.4 (P8=15), optional
//! - power zone: `0.5 + effect * 0.5 * pot_norm` around the P7 window
//!
//! Output is not clamped; overflow checks belong to the scorer.

use serde::{Deserialize, Serialize};

use super::curve::ResponseCurve;
use super::power_zone::calculate_power_zone;
use crate::config::{EngineConfig, SAMPLE_COUNT};
use crate::error::EngineResult;
use crate::params::ParameterVector;

/// Full-scale reading of the pot and of the power knob
const FULL_SCALE: f64 = 15.0;
/// Steps between the lowest and highest knob setting
const KNOB_STEPS: f64 = 14.0;

const SENSITIVITY_EXPONENT_MAX: f64 = 2.7;
const SENSITIVITY_EXPONENT_SPAN: f64 = 2.2;
const ACCEL_GAIN: f64 = 0.1;
const POST_CURVE_BASE: f64 = 0.6;
const POST_CURVE_SPAN: f64 = 0.8;

/// How the raw model output is presented
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CurveMode {
    /// Raw model output; the endpoint is whatever the knobs produce
    #[default]
    Natural,
    /// Raw output multiplied by a maximum voltage (chart and export rendering)
    Scaled {
        /// Volts at full natural output
        max_voltage: f64,
    },
    /// Whole curve rescaled so the endpoint equals the target voltage
    Ceiling {
        /// Endpoint voltage after rescaling
        target_voltage: f64,
    },
}

/// Simulate the live chart curve for a parameter vector
pub fn simulate(
    params: &ParameterVector,
    use_post_curve_delivery: bool,
) -> EngineResult<ResponseCurve> {
    simulate_mode(
        params,
        use_post_curve_delivery,
        CurveMode::Natural,
        &EngineConfig::default(),
    )
}

/// Simulate with an explicit presentation mode and knob limits
pub fn simulate_mode(
    params: &ParameterVector,
    use_post_curve_delivery: bool,
    mode: CurveMode,
    config: &EngineConfig,
) -> EngineResult<ResponseCurve> {
    params.validate(config)?;
    match mode {
        CurveMode::Natural => {}
        CurveMode::Scaled { max_voltage } => config.check_voltage("max_voltage", max_voltage)?,
        CurveMode::Ceiling { target_voltage } => {
            config.check_voltage("target_voltage", target_voltage)?
        }
    }
    Ok(render(params, use_post_curve_delivery, mode))
}

/// Run the model on an already validated vector
pub(crate) fn render(
    params: &ParameterVector,
    use_post_curve_delivery: bool,
    mode: CurveMode,
) -> ResponseCurve {
    let pot_norm = f64::from(params.pot_value) / FULL_SCALE;
    let exponent = SENSITIVITY_EXPONENT_MAX
        - knob_offset(params.sensitivity) * (SENSITIVITY_EXPONENT_SPAN / KNOB_STEPS);
    let sensitivity = pot_norm.powf(exponent);
    let power_factor = (f64::from(params.power) / FULL_SCALE) * sensitivity;
    let accel_factor = 1.0 + knob_offset(params.acceleration) * ACCEL_GAIN / KNOB_STEPS;
    let multiplier = if use_post_curve_delivery {
        POST_CURVE_BASE + knob_offset(params.post_curve) * (POST_CURVE_SPAN / KNOB_STEPS)
    } else {
        1.0
    };
    let zone = calculate_power_zone(params.power_zone);
    let gain = power_factor * multiplier;

    let last = (SAMPLE_COUNT - 1) as f64;
    let samples = (0..SAMPLE_COUNT)
        .map(|i| {
            let x = i as f64 / last;
            let mut y = progressivity(x, accel_factor);
            y *= 0.5 + zone.effect_at(x) * 0.5 * pot_norm;
            y * gain
        })
        .collect();
    let mut curve = ResponseCurve::from_samples(samples);

    match mode {
        CurveMode::Natural => {}
        CurveMode::Scaled { max_voltage } => curve.scale(max_voltage),
        CurveMode::Ceiling { target_voltage } => {
            curve.scale(ceiling_scale(curve.endpoint(), target_voltage));
        }
    }
    curve
}

/// Factor that moves `endpoint` onto `target_voltage`; a zero endpoint
/// leaves the curve unscaled.
fn ceiling_scale(endpoint: f64, target_voltage: f64) -> f64 {
    if endpoint == 0.0 {
        1.0
    } else {
        target_voltage / endpoint
    }
}

/// Steps above the lowest knob setting
fn knob_offset(value: u8) -> f64 {
    f64::from(value.saturating_sub(1))
}

/// `x ^ (1 / accel)` with the zero-pull sample pinned to zero
fn progressivity(x: f64, accel_factor: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    x.powf(1.0 / accel_factor)
}
