//! Engine errors

use thiserror::Error;

/// Errors surfaced by the curve engine.
///
/// All validation failures are reported synchronously and never retried;
/// nothing the engine does is transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A value lies outside its declared range
    #[error("Invalid value for '{field}': {value} is outside [{min}, {max}]")]
    InvalidParameter {
        /// Name of the offending field
        field: &'static str,
        /// Rejected value
        value: f64,
        /// Lowest allowed value
        min: f64,
        /// Highest allowed value
        max: f64,
    },

    /// Inverted or out-of-domain bounds
    #[error("Invalid range: min={min}, max={max}")]
    InvalidRange {
        /// Requested lower bound
        min: f64,
        /// Requested upper bound
        max: f64,
    },

    /// A search grid axis has no values
    #[error("Search grid has no values for '{field}'")]
    EmptyGrid {
        /// Name of the empty axis
        field: &'static str,
    },

    /// Too few control points to interpolate
    #[error("Degenerate curve: need at least 2 control points, got {points}")]
    DegenerateCurve {
        /// Number of points supplied
        points: usize,
    },

    /// The search was preempted through its cancellation token
    #[error("Search cancelled")]
    Cancelled,
}

/// Convenience alias for engine results
pub type EngineResult<T> = Result<T, EngineError>;
