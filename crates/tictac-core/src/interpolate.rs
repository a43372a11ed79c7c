//! Curve densification
//!
//! Resamples a sparse, evenly spaced control-point sequence onto the same
//! 101-sample grid the forward model produces, so drawn and simulated
//! curves compare sample by sample.

use crate::config::SAMPLE_COUNT;
use crate::error::{EngineError, EngineResult};
use crate::model::ResponseCurve;

/// Piecewise-linear resampling of `points` onto the response grid.
///
/// Control point `i` sits at trigger position `i * 100 / (N - 1)`. Samples
/// past the last segment repeat the last point; nothing is extrapolated.
pub fn interpolate(points: &[f64]) -> EngineResult<ResponseCurve> {
    if points.len() < 2 {
        return Err(EngineError::DegenerateCurve {
            points: points.len(),
        });
    }

    let last = points.len() - 1;
    let step = (SAMPLE_COUNT - 1) as f64 / last as f64;

    let samples = (0..SAMPLE_COUNT)
        .map(|i| {
            let position = i as f64;
            let idx = (position / step).floor() as usize;
            if idx >= last {
                return points[last];
            }
            let frac = (position % step) / step;
            points[idx] + frac * (points[idx + 1] - points[idx])
        })
        .collect();

    Ok(ResponseCurve::from_samples(samples))
}
