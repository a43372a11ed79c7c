//! # TicTac Core Library
//!
//! Trigger-response curve engine for the TICTAC V7 controller simulator.
//!
//! This library provides:
//! - The forward model: controller knobs to a 101-sample response curve
//! - Curve interpolation for hand-drawn target curves
//! - Inverse search over a coarse parameter grid for the best-matching knobs
//! - Factory presets, profile sets, and CSV export
//!
//! The engine is pure: every call computes from its inputs alone and holds
//! no state between calls, so it is safe to share across threads.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tictac_core::prelude::*;
//!
//! // Render the live chart curve for the power-on profile
//! let curve = simulate(&ParameterVector::default(), true)?;
//! println!("Natural endpoint: {:.3}", curve.endpoint());
//!
//! // Find the knobs that best reproduce a straight 0-12 V ramp
//! let target = TargetCurve::default();
//! let result = invert(target.points(), 10.0, 14.0)?;
//! for candidate in result.iter() {
//!     println!("{} error {:.1}", candidate.id, candidate.error);
//! }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod export;
pub mod interpolate;
pub mod model;
pub mod params;
pub mod profiles;
pub mod search;
pub mod target;

pub use error::{EngineError, EngineResult};
pub use interpolate::interpolate;
pub use model::simulate;
pub use search::invert;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{EngineConfig, GridValues, SAMPLE_COUNT};
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::interpolate::interpolate;
    pub use crate::model::{
        calculate_power_zone, simulate, simulate_mode, CurveMode, PowerZone, ResponseCurve,
    };
    pub use crate::params::{presets, Knob, ParameterVector, Preset};
    pub use crate::profiles::{Profile, ProfileSet};
    pub use crate::search::{
        invert, Candidate, CandidateGenerator, CandidateId, CoarseGrid, InverseSearch,
        SearchResult,
    };
    pub use crate::target::TargetCurve;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
