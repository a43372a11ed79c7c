//! Device simulation
//!
//! The forward model, its power-zone helper, and the sampled curve type
//! shared by every other part of the engine.

mod curve;
mod forward;
mod power_zone;

pub use curve::ResponseCurve;
pub use forward::{simulate, simulate_mode, CurveMode};
pub(crate) use forward::render;
pub use power_zone::{calculate_power_zone, PowerZone, ZONE_WIDTH};
