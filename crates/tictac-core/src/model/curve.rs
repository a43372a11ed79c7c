//! Sampled response curve

use serde::Serialize;
use std::ops::Index;

use crate::config::SAMPLE_COUNT;

/// Output voltage at each trigger-pull percentage 0..=100.
///
/// Consumers must not assume the curve is monotonic: power-zone shaping can
/// push mid-pull samples above the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResponseCurve {
    samples: Vec<f64>,
}

impl ResponseCurve {
    pub(crate) fn from_samples(samples: Vec<f64>) -> Self {
        debug_assert_eq!(samples.len(), SAMPLE_COUNT);
        Self { samples }
    }

    /// Voltage per trigger-pull percentage
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples, always `SAMPLE_COUNT` for engine output
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for a curve with no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at a trigger-pull percentage
    pub fn at(&self, position: usize) -> Option<f64> {
        self.samples.get(position).copied()
    }

    /// Sample at full trigger pull
    pub fn endpoint(&self) -> f64 {
        self.samples.last().copied().unwrap_or(0.0)
    }

    /// Highest sample anywhere on the curve
    pub fn peak(&self) -> f64 {
        self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// `(trigger %, volts)` pairs
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.samples.iter().copied().enumerate()
    }

    /// Sum of absolute per-sample differences
    pub fn l1_distance(&self, other: &ResponseCurve) -> f64 {
        self.samples
            .iter()
            .zip(&other.samples)
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    /// True when any sample is above `ceiling + tolerance`
    pub fn exceeds(&self, ceiling: f64, tolerance: f64) -> bool {
        let limit = ceiling + tolerance;
        self.samples.iter().any(|&v| v > limit)
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        for v in &mut self.samples {
            *v *= factor;
        }
    }
}

impl Index<usize> for ResponseCurve {
    type Output = f64;

    fn index(&self, position: usize) -> &f64 {
        &self.samples[position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(top: f64) -> ResponseCurve {
        ResponseCurve::from_samples(
            (0..SAMPLE_COUNT)
                .map(|i| top * i as f64 / 100.0)
                .collect(),
        )
    }

    #[test]
    fn l1_distance_of_offset_ramps() {
        let a = ramp(10.0);
        let b = ramp(12.0);
        // differences are 0.02 * i for i in 0..=100
        assert!((a.l1_distance(&b) - 101.0).abs() < 1e-9);
        assert_eq!(a.l1_distance(&a), 0.0);
    }

    #[test]
    fn exceeds_respects_tolerance() {
        let curve = ramp(12.04);
        assert!(!curve.exceeds(12.0, 0.05));
        assert!(curve.exceeds(12.0, 0.02));
    }

    #[test]
    fn endpoint_and_peak() {
        let mut samples = vec![0.0; SAMPLE_COUNT];
        samples[40] = 9.0;
        samples[100] = 6.0;
        let curve = ResponseCurve::from_samples(samples);
        assert_eq!(curve.endpoint(), 6.0);
        assert_eq!(curve.peak(), 9.0);
        assert_eq!(curve.at(40), Some(9.0));
        assert_eq!(curve.at(101), None);
    }
}
