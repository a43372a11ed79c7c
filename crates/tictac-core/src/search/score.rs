//! Candidate scoring

use serde::Serialize;
use std::fmt;

use crate::config::EngineConfig;
use crate::model::{render, CurveMode, ResponseCurve};
use crate::params::ParameterVector;

/// Identity of a candidate within one search: its enumeration index.
///
/// The same search over the same grid always yields the same ids, so a
/// front end can keep a selection across re-renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CandidateId(pub u64);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parameter vector evaluated against a target curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// Enumeration index within the search
    pub id: CandidateId,
    /// Settings that produced `sim_curve`
    pub params: ParameterVector,
    /// Simulated curve, rescaled to `params.max_voltage`
    pub sim_curve: ResponseCurve,
    /// Sum of absolute deviations from the target, in volts
    pub error: f64,
    /// Some sample exceeds `params.max_voltage` by more than the tolerance
    pub overflow: bool,
}

/// Runs the forward model in ceiling mode and measures the result
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    /// Apply the P8 multiplier when rendering
    pub use_post_curve_delivery: bool,
    /// Volts a sample may exceed the ceiling by
    pub overflow_tolerance: f64,
}

impl Scorer {
    /// Scorer using the configured delivery mode and tolerance
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            use_post_curve_delivery: config.use_post_curve_delivery,
            overflow_tolerance: config.overflow_tolerance,
        }
    }

    /// Score a validated parameter vector against a target curve
    pub fn score(
        &self,
        id: CandidateId,
        params: &ParameterVector,
        target: &ResponseCurve,
    ) -> Candidate {
        let sim_curve = render(
            params,
            self.use_post_curve_delivery,
            CurveMode::Ceiling {
                target_voltage: params.max_voltage,
            },
        );
        self.evaluate(id, *params, sim_curve, target)
    }

    /// Measure an already simulated curve
    pub fn evaluate(
        &self,
        id: CandidateId,
        params: ParameterVector,
        sim_curve: ResponseCurve,
        target: &ResponseCurve,
    ) -> Candidate {
        let error = sim_curve.l1_distance(target);
        let overflow = sim_curve.exceeds(params.max_voltage, self.overflow_tolerance);
        Candidate {
            id,
            params,
            sim_curve,
            error,
            overflow,
        }
    }
}
