//! User-drawn target curve

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::interpolate::interpolate;
use crate::model::ResponseCurve;

/// Control points in a freshly opened editor
pub const DEFAULT_CONTROL_POINTS: usize = 15;
/// Voltage of the pinned last point in a freshly opened editor
pub const DEFAULT_TARGET_VOLTAGE: f64 = 12.0;

/// Evenly spaced control points over the trigger travel.
///
/// The last point is pinned: edits to it are refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCurve {
    points: Vec<f64>,
    voltage_min: f64,
    voltage_max: f64,
}

impl Default for TargetCurve {
    fn default() -> Self {
        let config = EngineConfig::default();
        let points = linear_points(DEFAULT_CONTROL_POINTS, DEFAULT_TARGET_VOLTAGE);
        Self {
            points,
            voltage_min: config.voltage_min,
            voltage_max: config.voltage_max,
        }
    }
}

impl TargetCurve {
    /// Build from explicit points; each must lie in the voltage domain
    pub fn new(points: Vec<f64>, config: &EngineConfig) -> EngineResult<Self> {
        if points.len() < 2 {
            return Err(EngineError::DegenerateCurve {
                points: points.len(),
            });
        }
        for &value in &points {
            config.check_voltage("control_point", value)?;
        }
        Ok(Self {
            points,
            voltage_min: config.voltage_min,
            voltage_max: config.voltage_max,
        })
    }

    /// Straight ramp from 0 V to `top` over `count` points
    pub fn linear(count: usize, top: f64, config: &EngineConfig) -> EngineResult<Self> {
        Self::new(linear_points(count, top), config)
    }

    /// Control point voltages, left to right
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of control points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True for a curve with no control points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Index of the pinned endpoint
    pub fn pinned_index(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Trigger-pull percentage of a control point
    pub fn position_of(&self, index: usize) -> f64 {
        index as f64 * 100.0 / self.pinned_index() as f64
    }

    /// Move a control point, clamping the value into the voltage domain.
    ///
    /// Returns false when the index is out of bounds or pinned.
    pub fn set_point(&mut self, index: usize, value: f64) -> bool {
        if index >= self.pinned_index() || value.is_nan() {
            return false;
        }
        self.points[index] = value.clamp(self.voltage_min, self.voltage_max);
        true
    }

    /// Dense curve comparable with simulated output
    pub fn densify(&self) -> EngineResult<ResponseCurve> {
        interpolate(&self.points)
    }
}

fn linear_points(count: usize, top: f64) -> Vec<f64> {
    let last = count.saturating_sub(1).max(1) as f64;
    (0..count).map(|i| top * i as f64 / last).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_editor_is_a_ramp_to_twelve_volts() {
        let target = TargetCurve::default();
        assert_eq!(target.len(), DEFAULT_CONTROL_POINTS);
        assert_eq!(target.points()[0], 0.0);
        assert!((target.points()[14] - 12.0).abs() < 1e-12);
        assert!((target.points()[1] - 12.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn pinned_point_cannot_move() {
        let mut target = TargetCurve::default();
        assert!(!target.set_point(14, 3.0));
        assert!(!target.set_point(99, 3.0));
        assert!((target.points()[14] - 12.0).abs() < 1e-12);
    }

    #[test]
    fn drags_are_clamped_to_voltage_domain() {
        let mut target = TargetCurve::default();
        assert!(target.set_point(3, 40.0));
        assert_eq!(target.points()[3], 16.0);
        assert!(target.set_point(4, -2.0));
        assert_eq!(target.points()[4], 0.0);
    }

    #[test]
    fn out_of_domain_points_are_rejected() {
        let config = EngineConfig::default();
        let err = TargetCurve::new(vec![0.0, 17.0, 12.0], &config).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParameter {
                field: "control_point",
                ..
            }
        ));
        assert_eq!(
            TargetCurve::new(vec![1.0], &config),
            Err(EngineError::DegenerateCurve { points: 1 })
        );
    }

    #[test]
    fn densified_curve_ends_at_pinned_point() {
        let target = TargetCurve::default();
        let curve = target.densify().unwrap();
        assert!((curve.endpoint() - 12.0).abs() < 1e-12);
        assert_eq!(curve[0], 0.0);
        assert_eq!(target.position_of(7), 50.0);
    }
}
