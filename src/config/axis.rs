//! Per-axis homing parameters.

use core::fmt::Write;

use heapless::String;

use super::pin::PinDescriptor;
use super::table::{ConfigSource, MAX_KEY_LEN};
use super::units::{Millimeters, MillimetersPerSec};

/// Maximum number of axes a homing controller can drive.
pub const MAX_AXES: usize = 6;

/// Configuration key prefix for each axis, in axis index order.
pub const AXIS_KEY_PREFIXES: [&str; MAX_AXES] =
    ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"];

/// Homing-order letter for each axis, in axis index order.
pub const AXIS_LETTERS: [char; MAX_AXES] = ['X', 'Y', 'Z', 'A', 'B', 'C'];

/// Legacy (steps/s, steps/s, steps) defaults for fast rate, slow rate and retract.
const LEGACY_DEFAULTS: [(f32, f32, f32); MAX_AXES] = [
    (4000.0, 2000.0, 400.0),
    (4000.0, 2000.0, 400.0),
    (6400.0, 3200.0, 1600.0),
    (4000.0, 2000.0, 400.0),
    (4000.0, 2000.0, 400.0),
    (4000.0, 2000.0, 400.0),
];

/// Default travel minimum, used as the homing position when homing to min.
pub const DEFAULT_AXIS_MIN: f32 = 0.0;

/// Default travel maximum, used as the homing position when homing to max.
pub const DEFAULT_AXIS_MAX: f32 = 200.0;

/// Which endstop an axis homes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomeDirection {
    /// Move toward the minimum endstop.
    #[default]
    ToMin,
    /// Move toward the maximum endstop.
    ToMax,
}

impl HomeDirection {
    /// Parse a direction token. Anything but `home_to_max` homes to min.
    pub fn from_token(token: &str) -> Self {
        if token.trim() == "home_to_max" {
            HomeDirection::ToMax
        } else {
            HomeDirection::ToMin
        }
    }

    /// `true` when homing toward the minimum endstop.
    #[inline]
    pub fn toward_min(self) -> bool {
        self == HomeDirection::ToMin
    }

    /// The opposite direction.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            HomeDirection::ToMin => HomeDirection::ToMax,
            HomeDirection::ToMax => HomeDirection::ToMin,
        }
    }
}

/// Resolved homing parameters for one axis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisConfig {
    /// Minimum endstop, `None` when not connected.
    pub min_endstop: Option<PinDescriptor>,
    /// Maximum endstop, `None` when not connected.
    pub max_endstop: Option<PinDescriptor>,
    /// Coarse approach speed.
    pub fast_rate: MillimetersPerSec,
    /// Retract and precision approach speed.
    pub slow_rate: MillimetersPerSec,
    /// Back-off distance between the coarse and precision approaches.
    pub retract: Millimeters,
    /// Endstop the axis homes against.
    pub home_direction: HomeDirection,
    /// Coordinate assigned to the axis once its endstop is reached.
    pub homing_position: Millimeters,
}

impl AxisConfig {
    /// Resolve the parameters of `axis` from `source`.
    ///
    /// Legacy step-denominated settings are read first and converted with
    /// `steps_per_mm`; the millimeter-native keys then override them. A
    /// non-positive `steps_per_mm` skips the legacy conversion entirely.
    pub fn resolve<S: ConfigSource + ?Sized>(source: &S, axis: usize, steps_per_mm: f32) -> Self {
        let prefix = AXIS_KEY_PREFIXES[axis];
        let (fast_default, slow_default, retract_default) = LEGACY_DEFAULTS[axis];

        let min_endstop = source
            .text(&axis_key(prefix, "min_endstop"))
            .and_then(PinDescriptor::parse_optional);
        let max_endstop = source
            .text(&axis_key(prefix, "max_endstop"))
            .and_then(PinDescriptor::parse_optional);

        // Older settings in steps, kept for backwards compatibility
        let legacy_valid = steps_per_mm.is_finite() && steps_per_mm > 0.0;
        let (fast, slow, retract) = if legacy_valid {
            let fast = source.number_or(&axis_key(prefix, "fast_homing_rate"), fast_default);
            let slow = source.number_or(&axis_key(prefix, "slow_homing_rate"), slow_default);
            let retract = source.number_or(&axis_key(prefix, "homing_retract"), retract_default);
            (
                MillimetersPerSec::from_steps_per_sec(fast, steps_per_mm),
                MillimetersPerSec::from_steps_per_sec(slow, steps_per_mm),
                Millimeters::from_steps(retract, steps_per_mm),
            )
        } else {
            (
                MillimetersPerSec(f32::NAN),
                MillimetersPerSec(f32::NAN),
                Millimeters(f32::NAN),
            )
        };

        // Millimeter settings win when present
        let fast = source.number_or(&axis_key(prefix, "fast_homing_rate_mm_s"), fast.0);
        let slow = source.number_or(&axis_key(prefix, "slow_homing_rate_mm_s"), slow.0);
        let retract = source.number_or(&axis_key(prefix, "homing_retract_mm"), retract.0);

        let home_direction = HomeDirection::from_token(
            source.text_or(&axis_key(prefix, "homing_direction"), "home_to_min"),
        );

        let homing_position = match home_direction {
            HomeDirection::ToMin => source.number_or(&axis_key(prefix, "min"), DEFAULT_AXIS_MIN),
            HomeDirection::ToMax => source.number_or(&axis_key(prefix, "max"), DEFAULT_AXIS_MAX),
        };

        Self {
            min_endstop,
            max_endstop,
            fast_rate: MillimetersPerSec(fast),
            slow_rate: MillimetersPerSec(slow),
            retract: Millimeters(retract),
            home_direction,
            homing_position: Millimeters(homing_position),
        }
    }

    /// The endstop this axis homes against, `None` when not connected.
    #[inline]
    pub fn homing_endstop(&self) -> Option<&PinDescriptor> {
        match self.home_direction {
            HomeDirection::ToMin => self.min_endstop.as_ref(),
            HomeDirection::ToMax => self.max_endstop.as_ref(),
        }
    }
}

/// Build `<prefix>_<suffix>`.
pub(crate) fn axis_key(prefix: &str, suffix: &str) -> String<MAX_KEY_LEN> {
    let mut key = String::new();
    let _ = write!(key, "{}_{}", prefix, suffix);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigTable;

    #[test]
    fn test_direction_tokens() {
        assert_eq!(HomeDirection::from_token("home_to_max"), HomeDirection::ToMax);
        assert_eq!(HomeDirection::from_token("home_to_min"), HomeDirection::ToMin);
        assert_eq!(HomeDirection::from_token("sideways"), HomeDirection::ToMin);
        assert!(HomeDirection::ToMin.toward_min());
        assert_eq!(HomeDirection::ToMax.reversed(), HomeDirection::ToMin);
    }

    #[test]
    fn test_legacy_only_defaults() {
        let table = ConfigTable::new();
        let axis = AxisConfig::resolve(&table, 0, 80.0);

        assert!((axis.fast_rate.value() - 50.0).abs() < 1e-4);
        assert!((axis.slow_rate.value() - 25.0).abs() < 1e-4);
        assert!((axis.retract.value() - 5.0).abs() < 1e-4);
        assert_eq!(axis.home_direction, HomeDirection::ToMin);
        assert_eq!(axis.homing_position, Millimeters(0.0));
        assert!(axis.min_endstop.is_none());
        assert!(axis.max_endstop.is_none());
    }

    #[test]
    fn test_gamma_legacy_defaults() {
        let table = ConfigTable::new();
        let axis = AxisConfig::resolve(&table, 2, 1600.0);

        assert!((axis.fast_rate.value() - 4.0).abs() < 1e-4);
        assert!((axis.slow_rate.value() - 2.0).abs() < 1e-4);
        assert!((axis.retract.value() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_mm_override_wins() {
        let mut table = ConfigTable::new();
        table.set_number("beta_fast_homing_rate", 8000.0);
        table.set_number("beta_fast_homing_rate_mm_s", 30.0);
        table.set_number("beta_homing_retract_mm", 2.5);

        let axis = AxisConfig::resolve(&table, 1, 100.0);
        assert!((axis.fast_rate.value() - 30.0).abs() < 1e-4);
        assert!((axis.slow_rate.value() - 20.0).abs() < 1e-4);
        assert!((axis.retract.value() - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_home_to_max_position() {
        let mut table = ConfigTable::new();
        table.set_text("beta_homing_direction", "home_to_max");
        table.set_number("beta_min", -10.0);

        let axis = AxisConfig::resolve(&table, 1, 100.0);
        assert_eq!(axis.home_direction, HomeDirection::ToMax);
        assert_eq!(axis.homing_position, Millimeters(200.0));

        table.set_number("beta_max", 310.0);
        let axis = AxisConfig::resolve(&table, 1, 100.0);
        assert_eq!(axis.homing_position, Millimeters(310.0));
    }

    #[test]
    fn test_endstop_descriptors() {
        let mut table = ConfigTable::new();
        table.set_text("alpha_min_endstop", "1.24^!");
        table.set_text("alpha_max_endstop", "nc");
        table.set_text("alpha_homing_direction", "home_to_max");

        let axis = AxisConfig::resolve(&table, 0, 80.0);
        let min = axis.min_endstop.unwrap();
        assert_eq!((min.port, min.pin, min.inverted), (1, 24, true));
        assert!(axis.max_endstop.is_none());
        assert!(axis.homing_endstop().is_none());
    }

    #[test]
    fn test_invalid_steps_per_mm_skips_legacy() {
        let table = ConfigTable::new();
        let axis = AxisConfig::resolve(&table, 0, 0.0);
        assert!(axis.fast_rate.value().is_nan());

        let mut table = ConfigTable::new();
        table.set_number("alpha_fast_homing_rate_mm_s", 12.0);
        let axis = AxisConfig::resolve(&table, 0, 0.0);
        assert_eq!(axis.fast_rate.value(), 12.0);
    }
}
