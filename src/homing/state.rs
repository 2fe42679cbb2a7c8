//! Homing state machine states and the shared status cell.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

/// Phase of the homing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum HomingState {
    /// No homing cycle in progress.
    #[default]
    NotHoming = 0,
    /// Coarse approach toward the endstop.
    MovingToEndstopFast = 1,
    /// Retracting away from the endstop.
    MovingBack = 2,
    /// Precision approach toward the endstop.
    MovingToEndstopSlow = 3,
    /// Backing off the endstop after homing.
    BackOffHome = 4,
    /// Travelling to the coordinate origin after homing.
    MoveToOrigin = 5,
    /// A limit switch fired outside a homing move.
    LimitTriggered = 6,
}

impl HomingState {
    /// Check if this state belongs to an active homing cycle.
    #[inline]
    pub fn is_homing(self) -> bool {
        self != HomingState::NotHoming
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => HomingState::MovingToEndstopFast,
            2 => HomingState::MovingBack,
            3 => HomingState::MovingToEndstopSlow,
            4 => HomingState::BackOffHome,
            5 => HomingState::MoveToOrigin,
            6 => HomingState::LimitTriggered,
            _ => HomingState::NotHoming,
        }
    }

    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            HomingState::NotHoming => "not homing",
            HomingState::MovingToEndstopFast => "fast approach",
            HomingState::MovingBack => "retract",
            HomingState::MovingToEndstopSlow => "slow approach",
            HomingState::BackOffHome => "back off",
            HomingState::MoveToOrigin => "move to origin",
            HomingState::LimitTriggered => "limit triggered",
        }
    }
}

impl fmt::Display for HomingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current homing state, readable from anywhere through a shared reference.
///
/// Only the homing controller writes it. Reads never block, so a status
/// query from an interrupt or another task is always answerable.
#[derive(Debug, Default)]
pub struct HomingStatus(AtomicU8);

impl HomingStatus {
    /// A status cell reading [`HomingState::NotHoming`]; usable in a `static`.
    pub const fn new() -> Self {
        Self(AtomicU8::new(HomingState::NotHoming as u8))
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> HomingState {
        HomingState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// `true` while a homing cycle is in progress.
    #[inline]
    pub fn is_homing(&self) -> bool {
        self.state().is_homing()
    }

    pub(crate) fn set(&self, state: HomingState) {
        self.0.store(state as u8, Ordering::Release);
    }
}
