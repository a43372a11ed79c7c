//! Device parameters
//!
//! A [`ParameterVector`] is the full set of controller settings fed to the
//! forward model: nine discrete knobs, the main pot reading, and the
//! configured maximum voltage.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::EngineConfig;
use crate::error::EngineResult;

/// One discrete controller setting.
///
/// Declaration order matches the nesting order of the inverse search grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Knob {
    /// P4 - maximum output power
    Power,
    /// P5 - acceleration response
    Acceleration,
    /// P7 - where on the trigger the pot acts
    PowerZone,
    /// P8 - delivery after a corner
    PostCurve,
    /// P10 - dual-purpose pot (brake or voltage), only 1 or 2
    Multifunction,
    /// P11 - brake anticipation on trigger release
    BrakeAnticipation,
    /// P14 - brake entry speed
    BrakeEntrySpeed,
    /// P15 - constant minimum brake
    MinimumBrake,
    /// P16 - power pot sensitivity
    Sensitivity,
}

impl Knob {
    /// All knobs, in grid order
    pub const ALL: [Knob; 9] = [
        Knob::Power,
        Knob::Acceleration,
        Knob::PowerZone,
        Knob::PostCurve,
        Knob::Multifunction,
        Knob::BrakeAnticipation,
        Knob::BrakeEntrySpeed,
        Knob::MinimumBrake,
        Knob::Sensitivity,
    ];

    /// Device parameter code as printed on the controller
    pub fn code(&self) -> &'static str {
        match self {
            Knob::Power => "P4",
            Knob::Acceleration => "P5",
            Knob::PowerZone => "P7",
            Knob::PostCurve => "P8",
            Knob::Multifunction => "P10",
            Knob::BrakeAnticipation => "P11",
            Knob::BrakeEntrySpeed => "P14",
            Knob::MinimumBrake => "P15",
            Knob::Sensitivity => "P16",
        }
    }

    /// Field name used in errors and serialized configs
    pub fn field_name(&self) -> &'static str {
        match self {
            Knob::Power => "power",
            Knob::Acceleration => "acceleration",
            Knob::PowerZone => "power_zone",
            Knob::PostCurve => "post_curve",
            Knob::Multifunction => "multifunction",
            Knob::BrakeAnticipation => "brake_anticipation",
            Knob::BrakeEntrySpeed => "brake_entry_speed",
            Knob::MinimumBrake => "minimum_brake",
            Knob::Sensitivity => "sensitivity",
        }
    }

    /// Short human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Knob::Power => "Power",
            Knob::Acceleration => "Acceleration",
            Knob::PowerZone => "Power Zone",
            Knob::PostCurve => "Post-Curve Delivery",
            Knob::Multifunction => "Multifunction Pot",
            Knob::BrakeAnticipation => "Brake Anticipation",
            Knob::BrakeEntrySpeed => "Brake Entry Speed",
            Knob::MinimumBrake => "Minimum Brake",
            Knob::Sensitivity => "Power Sensitivity",
        }
    }

    /// One-line description of what the knob does
    pub fn explanation(&self) -> &'static str {
        match self {
            Knob::Power => "Maximum output voltage limit",
            Knob::Acceleration => "Motor acceleration response",
            Knob::PowerZone => "Trigger zone where the potentiometer acts",
            Knob::PostCurve => "Power delivery after a corner",
            Knob::Multifunction => "Dual potentiometer: brake or voltage",
            Knob::BrakeAnticipation => "Brake anticipation when releasing the trigger",
            Knob::BrakeEntrySpeed => "Speed at which the brake engages",
            Knob::MinimumBrake => "Constant minimum brake level",
            Knob::Sensitivity => "Sensitivity of the power potentiometer",
        }
    }
}

impl fmt::Display for Knob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.display_name())
    }
}

/// Full controller configuration fed to the forward model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    /// P4, 1..=15
    pub power: u8,
    /// P5, 1..=15
    pub acceleration: u8,
    /// P7, 1..=15
    pub power_zone: u8,
    /// P8, 1..=15
    pub post_curve: u8,
    /// P10, 1 or 2
    pub multifunction: u8,
    /// P11, 1..=15
    pub brake_anticipation: u8,
    /// P14, 1..=15
    pub brake_entry_speed: u8,
    /// P15, 1..=15
    pub minimum_brake: u8,
    /// P16, 1..=15
    pub sensitivity: u8,
    /// Main pot reading, 1..=15
    pub pot_value: u8,
    /// Target voltage ceiling in volts
    pub max_voltage: f64,
}

/// The power-on profile (identical to factory map 2)
impl Default for ParameterVector {
    fn default() -> Self {
        Self {
            power: 6,
            acceleration: 4,
            power_zone: 10,
            post_curve: 8,
            multifunction: 1,
            brake_anticipation: 1,
            brake_entry_speed: 6,
            minimum_brake: 6,
            sensitivity: 2,
            pot_value: 15,
            max_voltage: 12.0,
        }
    }
}

impl ParameterVector {
    /// Build a vector from knob values in [`Knob::ALL`] order
    pub fn from_knobs(knobs: [u8; 9], pot_value: u8, max_voltage: f64) -> Self {
        let [
            power,
            acceleration,
            power_zone,
            post_curve,
            multifunction,
            brake_anticipation,
            brake_entry_speed,
            minimum_brake,
            sensitivity,
        ] = knobs;
        Self {
            power,
            acceleration,
            power_zone,
            post_curve,
            multifunction,
            brake_anticipation,
            brake_entry_speed,
            minimum_brake,
            sensitivity,
            pot_value,
            max_voltage,
        }
    }

    /// Knob values in [`Knob::ALL`] order
    pub fn knobs(&self) -> [u8; 9] {
        Knob::ALL.map(|knob| self.get(knob))
    }

    /// Value of one knob
    pub fn get(&self, knob: Knob) -> u8 {
        match knob {
            Knob::Power => self.power,
            Knob::Acceleration => self.acceleration,
            Knob::PowerZone => self.power_zone,
            Knob::PostCurve => self.post_curve,
            Knob::Multifunction => self.multifunction,
            Knob::BrakeAnticipation => self.brake_anticipation,
            Knob::BrakeEntrySpeed => self.brake_entry_speed,
            Knob::MinimumBrake => self.minimum_brake,
            Knob::Sensitivity => self.sensitivity,
        }
    }

    /// Copy with one knob changed. The result is not validated.
    pub fn with(mut self, knob: Knob, value: u8) -> Self {
        let slot = match knob {
            Knob::Power => &mut self.power,
            Knob::Acceleration => &mut self.acceleration,
            Knob::PowerZone => &mut self.power_zone,
            Knob::PostCurve => &mut self.post_curve,
            Knob::Multifunction => &mut self.multifunction,
            Knob::BrakeAnticipation => &mut self.brake_anticipation,
            Knob::BrakeEntrySpeed => &mut self.brake_entry_speed,
            Knob::MinimumBrake => &mut self.minimum_brake,
            Knob::Sensitivity => &mut self.sensitivity,
        };
        *slot = value;
        self
    }

    /// Reject any field outside its declared range. Values are never clamped.
    pub fn validate(&self, config: &EngineConfig) -> EngineResult<()> {
        for knob in Knob::ALL {
            config.check_knob(knob, self.get(knob))?;
        }
        config.check_pot(self.pot_value)?;
        config.check_voltage("max_voltage", self.max_voltage)
    }
}

/// A named factory map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    /// Name shown on the controller
    pub name: &'static str,
    /// Settings of the map
    pub params: ParameterVector,
}

/// The four factory maps shipped on the controller
pub fn presets() -> [Preset; 4] {
    let base = ParameterVector::default();
    [
        Preset {
            name: "Map 1",
            params: ParameterVector {
                power: 4,
                power_zone: 1,
                brake_anticipation: 2,
                ..base
            },
        },
        Preset {
            name: "Map 2",
            params: base,
        },
        Preset {
            name: "Map 3",
            params: ParameterVector {
                power: 8,
                power_zone: 1,
                post_curve: 10,
                brake_anticipation: 2,
                ..base
            },
        },
        Preset {
            name: "Map 4",
            params: ParameterVector {
                power: 8,
                power_zone: 1,
                post_curve: 10,
                multifunction: 2,
                ..base
            },
        },
    ]
}
