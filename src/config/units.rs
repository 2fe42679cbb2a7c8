//! Unit types for physical quantities.
//!
//! Keeps millimeters, millimeters per second and raw steps apart so legacy
//! step-denominated settings cannot be mixed with their millimeter overrides.

use core::ops::{Add, Sub};

use serde::Deserialize;

/// Linear position or distance in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Millimeters(pub f32);

impl Millimeters {
    /// Create a new Millimeters value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Convert a legacy distance given in (possibly fractional) steps.
    #[inline]
    pub fn from_steps(steps: f32, steps_per_mm: f32) -> Self {
        Self(steps / steps_per_mm)
    }

    /// Convert to a whole number of steps, rounding toward zero.
    #[inline]
    pub fn to_steps(self, steps_per_mm: f32) -> Steps {
        Steps((self.0 * steps_per_mm) as i64)
    }
}

/// Linear speed in millimeters per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct MillimetersPerSec(pub f32);

impl MillimetersPerSec {
    /// Create a new MillimetersPerSec value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Step rate in steps per second at the given resolution.
    #[inline]
    pub fn to_steps_per_sec(self, steps_per_mm: f32) -> f32 {
        self.0 * steps_per_mm
    }

    /// Convert a legacy steps-per-second rate.
    #[inline]
    pub fn from_steps_per_sec(steps_per_sec: f32, steps_per_mm: f32) -> Self {
        Self(steps_per_sec / steps_per_mm)
    }

    /// Returns the slower of two speeds.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }
}

/// Actuator position in steps (absolute from origin).
///
/// Uses i64 for unlimited range in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Steps(pub i64);

impl Steps {
    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Get absolute value as u64.
    #[inline]
    pub fn abs(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Convert to millimeters.
    #[inline]
    pub fn to_millimeters(self, steps_per_mm: f32) -> Millimeters {
        Millimeters(self.0 as f32 / steps_per_mm)
    }
}

impl Add for Steps {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Steps {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
