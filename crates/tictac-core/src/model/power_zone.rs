//! Power zone placement

use serde::Serialize;

/// Zone center at the lowest knob setting
pub const ZONE_CENTER_MIN: f64 = 0.2;
/// Distance the center travels across the knob range
pub const ZONE_CENTER_TRAVEL: f64 = 0.6;
/// Nominal zone width before clipping
pub const ZONE_WIDTH: f64 = 0.4;

/// Window of the normalized trigger domain where the pot has peak influence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerZone {
    /// Left edge, clipped to 0
    pub start: f64,
    /// Right edge, clipped to 1
    pub end: f64,
    /// Point of full effect
    pub center: f64,
}

impl PowerZone {
    /// Width after clipping
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Influence of the zone at trigger position `x` (0..=1), in [0, 1].
    ///
    /// A zero-width zone has no influence anywhere.
    pub fn effect_at(&self, x: f64) -> f64 {
        let max_dist = self.width();
        if max_dist <= 0.0 {
            return 0.0;
        }
        let dist = (x - self.center).abs();
        (1.0 - (dist / max_dist) * 2.0).max(0.0)
    }
}

/// Place the power zone for a P7 setting (1..=15)
pub fn calculate_power_zone(zone_knob: u8) -> PowerZone {
    let normalized = f64::from(zone_knob.saturating_sub(1)) / 14.0;
    let center = ZONE_CENTER_MIN + normalized * ZONE_CENTER_TRAVEL;
    PowerZone {
        start: (center - ZONE_WIDTH / 2.0).max(0.0),
        end: (center + ZONE_WIDTH / 2.0).min(1.0),
        center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_moves_across_the_trigger() {
        let low = calculate_power_zone(1);
        assert!((low.center - 0.2).abs() < 1e-12);
        assert_eq!(low.start, 0.0);
        assert!((low.end - 0.4).abs() < 1e-12);

        let high = calculate_power_zone(15);
        assert!((high.center - 0.8).abs() < 1e-12);
        assert!((high.start - 0.6).abs() < 1e-12);
        assert!((high.end - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zone_stays_inside_unit_interval() {
        for knob in 1..=15 {
            let zone = calculate_power_zone(knob);
            assert!(zone.start >= 0.0 && zone.end <= 1.0, "knob {knob}");
            assert!(zone.start <= zone.center && zone.center <= zone.end);
            assert!((zone.width() - ZONE_WIDTH).abs() < 1e-9);
        }
    }

    #[test]
    fn effect_peaks_at_center() {
        let zone = calculate_power_zone(8);
        assert_eq!(zone.effect_at(zone.center), 1.0);
        assert!(zone.effect_at(zone.center + zone.width() / 2.0) < 1e-9);
        assert!((zone.effect_at(zone.center + zone.width() / 4.0) - 0.5).abs() < 1e-9);
        assert_eq!(zone.effect_at(0.0), 0.0);
    }

    #[test]
    fn zero_width_zone_is_neutral() {
        let zone = PowerZone {
            start: 0.5,
            end: 0.5,
            center: 0.5,
        };
        assert_eq!(zone.effect_at(0.5), 0.0);
    }
}
