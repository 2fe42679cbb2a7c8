//! Homed actuator position and cycle outcome.

use heapless::Vec;

use crate::config::units::Millimeters;
use crate::config::MAX_AXES;
use crate::kinematics::ArmSolution;

/// Actuator coordinates established by a homing cycle.
///
/// One entry per machine axis; axes that were not homed hold `None`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorPosition {
    axes: Vec<Option<Millimeters>, MAX_AXES>,
}

impl ActuatorPosition {
    /// A position for `axis_count` axes with nothing homed.
    pub fn unhomed(axis_count: usize) -> Self {
        let mut axes = Vec::new();
        for _ in 0..axis_count.min(MAX_AXES) {
            let _ = axes.push(None);
        }
        Self { axes }
    }

    /// Record the homed coordinate of `axis`.
    pub fn set(&mut self, axis: usize, position: Millimeters) {
        if let Some(slot) = self.axes.get_mut(axis) {
            *slot = Some(position);
        }
    }

    /// Homed coordinate of `axis`, `None` if it was not homed.
    #[inline]
    pub fn get(&self, axis: usize) -> Option<Millimeters> {
        self.axes.get(axis).copied().flatten()
    }

    /// Number of machine axes covered.
    #[inline]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Check if every axis was homed.
    pub fn is_complete(&self) -> bool {
        self.axes.iter().all(Option::is_some)
    }

    /// Iterate over `(axis, coordinate)` for homed axes.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Millimeters)> + '_ {
        self.axes
            .iter()
            .enumerate()
            .filter_map(|(axis, pos)| pos.map(|p| (axis, p)))
    }

    /// Cartesian coordinates of a fully homed three-actuator machine.
    pub fn to_cartesian<K: ArmSolution + ?Sized>(&self, solution: &K) -> Option<[f32; 3]> {
        let actuator = [self.get(0)?.0, self.get(1)?.0, self.get(2)?.0];
        Some(solution.actuator_to_cartesian(&actuator))
    }
}

/// How a homing cycle ended.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingOutcome {
    /// Every group finished; the position was reported to the machine.
    Completed(ActuatorPosition),
    /// The cycle stopped early (halt raised or homing disabled).
    /// Machine position is not homed.
    Aborted,
}

impl HomingOutcome {
    /// Check if the cycle completed.
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, HomingOutcome::Completed(_))
    }

    /// The established position, if the cycle completed.
    pub fn position(&self) -> Option<&ActuatorPosition> {
        match self {
            HomingOutcome::Completed(position) => Some(position),
            HomingOutcome::Aborted => None,
        }
    }
}
