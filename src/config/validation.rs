//! Configuration validation.
//!
//! Homing configuration never fails to load. Validation reports what is
//! wrong and [`sanitize_axis`] replaces each offending value with a safe
//! fallback so the controller always has a usable pulse cadence.

use crate::error::ConfigError;

use super::axis::AxisConfig;
use super::units::{Millimeters, MillimetersPerSec};

/// Fast rate used when the configured one is unusable.
pub const FALLBACK_FAST_RATE: MillimetersPerSec = MillimetersPerSec(10.0);

/// Slow rate used when the configured one is unusable.
pub const FALLBACK_SLOW_RATE: MillimetersPerSec = MillimetersPerSec(2.0);

/// Retract used when the configured one is unusable.
pub const FALLBACK_RETRACT: Millimeters = Millimeters(0.0);

/// Validate one axis.
///
/// Checks:
/// - Fast and slow rates are finite and positive
/// - Retract is finite and non-negative
pub fn validate_axis(config: &AxisConfig) -> Result<(), ConfigError> {
    if !is_positive(config.fast_rate.0) {
        return Err(ConfigError::InvalidFastRate(config.fast_rate.0));
    }

    if !is_positive(config.slow_rate.0) {
        return Err(ConfigError::InvalidSlowRate(config.slow_rate.0));
    }

    if !(config.retract.0.is_finite() && config.retract.0 >= 0.0) {
        return Err(ConfigError::InvalidRetract(config.retract.0));
    }

    Ok(())
}

/// Validate a steps-per-millimeter resolution.
pub fn validate_steps_per_mm(steps_per_mm: f32) -> Result<(), ConfigError> {
    if is_positive(steps_per_mm) {
        Ok(())
    } else {
        Err(ConfigError::InvalidStepsPerMm(steps_per_mm))
    }
}

/// Replace every invalid value of `config` with its fallback.
///
/// Returns the number of values replaced.
pub fn sanitize_axis(axis: usize, config: &mut AxisConfig) -> usize {
    let mut replaced = 0;

    while let Err(e) = validate_axis(config) {
        warn!("axis {}: {}, using fallback", axis, ErrorText(&e));
        match e {
            ConfigError::InvalidFastRate(_) => config.fast_rate = FALLBACK_FAST_RATE,
            ConfigError::InvalidSlowRate(_) => config.slow_rate = FALLBACK_SLOW_RATE,
            ConfigError::InvalidRetract(_) => config.retract = FALLBACK_RETRACT,
            _ => break,
        }
        replaced += 1;
    }

    replaced
}

#[inline]
fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Formats a [`ConfigError`] for either logging backend.
struct ErrorText<'a>(&'a ConfigError);

impl core::fmt::Display for ErrorText<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self.0, f)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ErrorText<'_> {
    fn format(&self, f: defmt::Formatter) {
        match self.0 {
            ConfigError::InvalidFastRate(v) => defmt::write!(f, "invalid fast rate {}", v),
            ConfigError::InvalidSlowRate(v) => defmt::write!(f, "invalid slow rate {}", v),
            ConfigError::InvalidRetract(v) => defmt::write!(f, "invalid retract {}", v),
            ConfigError::InvalidStepsPerMm(v) => defmt::write!(f, "invalid steps/mm {}", v),
            _ => defmt::write!(f, "invalid configuration"),
        }
    }
}
