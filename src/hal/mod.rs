//! Capability interfaces between the homing controller and the machine.
//!
//! The controller never reaches for global state. Everything it touches is
//! reached through a [`Machine`] handed to it at construction: actuator
//! drives, endstop sensors, the motion queue barrier, the position reset
//! interface, the halt flag and the busy-wait delay.

mod drive;
mod endstop;

pub use drive::StepDirDrive;
pub use endstop::{NotConnected, PinEndstop};

use embedded_hal::delay::DelayNs;

use crate::config::HomeDirection;
use crate::error::Result;
use crate::homing::ActuatorPosition;

/// Which end of travel an endstop guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndstopSide {
    /// Minimum end of travel.
    Min,
    /// Maximum end of travel.
    Max,
}

impl EndstopSide {
    /// The endstop an axis meets when moving in `direction`.
    #[inline]
    pub fn facing(direction: HomeDirection) -> Self {
        match direction {
            HomeDirection::ToMin => EndstopSide::Min,
            HomeDirection::ToMax => EndstopSide::Max,
        }
    }
}

/// A digital travel-limit sensor.
pub trait EndstopSensor {
    /// `true` while the sensor reports contact.
    fn is_triggered(&mut self) -> Result<bool>;
}

/// A single actuator that moves one step per pulse.
pub trait ActuatorDrive {
    /// Set the direction of subsequent steps.
    fn set_direction(&mut self, direction: HomeDirection) -> Result<()>;

    /// Emit one step pulse in the current direction.
    fn step(&mut self) -> Result<()>;

    /// Pulse-to-distance conversion factor.
    fn steps_per_mm(&self) -> f32;
}

/// Barrier against queued trajectory motion.
pub trait MotionGate {
    /// Block until every queued move has finished executing.
    fn wait_for_idle(&mut self);
}

/// Receiver of the machine origin established by homing.
pub trait PositionSink {
    /// Overwrite the actuator position of every axis set in `position`.
    fn reset_actuator_position(&mut self, position: &ActuatorPosition);
}

/// Process-wide halt flag. Read, never written, by the homing controller.
pub trait HaltSignal {
    /// `true` once a halt (kill) has been requested.
    fn is_halted(&self) -> bool;
}

/// Everything a homing cycle needs from the machine.
///
/// The [`DelayNs`] implementation provides the per-iteration busy-wait that
/// spaces step pulses; it must block rather than yield.
pub trait Machine: MotionGate + PositionSink + HaltSignal + DelayNs {
    /// Number of actuators on the machine.
    fn axis_count(&self) -> usize;

    /// The drive for `axis`, if one is registered.
    fn drive(&mut self, axis: usize) -> Option<&mut dyn ActuatorDrive>;

    /// The endstop on `side` of `axis`, if one is wired.
    fn endstop(&mut self, axis: usize, side: EndstopSide) -> Option<&mut dyn EndstopSensor>;

    /// Steps-per-millimeter of every registered axis, in axis order.
    ///
    /// Axes without a drive report `0.0`.
    fn steps_per_mm(&mut self) -> heapless::Vec<f32, { crate::config::MAX_AXES }> {
        let count = self.axis_count().min(crate::config::MAX_AXES);
        (0..count)
            .map(|axis| self.drive(axis).map(|d| d.steps_per_mm()).unwrap_or(0.0))
            .collect()
    }
}
