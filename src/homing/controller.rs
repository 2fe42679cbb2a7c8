//! Homing cycle controller.
//!
//! Runs on the calling thread and busy-waits between step iterations; the
//! pulse cadence is derived from the configured speeds and must not be
//! interrupted by yielding. Cancellation is cooperative: the machine's halt
//! flag is polled once per iteration.

use crate::config::units::MillimetersPerSec;
use crate::config::{ApproachMode, AxisConfig, ConfigSource, HomingSettings};
use crate::error::{MotorError, Result};
use crate::hal::{EndstopSide, Machine};
use crate::mask::AxisMask;

use super::position::{ActuatorPosition, HomingOutcome};
use super::state::{HomingState, HomingStatus};
use super::timing::{step_budget, step_interval_ns};

/// How an approach or retract phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseEnd {
    /// Every axis stopped moving.
    Settled,
    /// The iteration budget ran out while an axis was still moving.
    Exhausted,
    /// The halt flag was raised.
    Halted,
}

/// Cadence shared by every axis of a group.
#[derive(Debug, Clone, Copy)]
struct GroupCadence {
    fast: MillimetersPerSec,
    slow: MillimetersPerSec,
    steps_per_mm: f32,
}

/// Drives a machine through homing cycles.
///
/// Owns the resolved [`HomingSettings`] and the [`Machine`] context; writes
/// the shared [`HomingStatus`].
///
/// # Example
///
/// ```rust,ignore
/// use actuator_homing::{AxisMask, HomingController, HomingStatus};
///
/// static STATUS: HomingStatus = HomingStatus::new();
///
/// let mut homing = HomingController::from_config(&table, machine, &STATUS);
/// let outcome = homing.run_homing_cycle(AxisMask::all(3))?;
/// ```
pub struct HomingController<'s, M: Machine> {
    settings: HomingSettings,
    machine: M,
    status: &'s HomingStatus,
}

impl<'s, M: Machine> HomingController<'s, M> {
    /// Create a controller from resolved settings.
    pub fn new(settings: HomingSettings, machine: M, status: &'s HomingStatus) -> Self {
        status.set(HomingState::NotHoming);
        Self {
            settings,
            machine,
            status,
        }
    }

    /// Resolve settings from `source` using the machine's actuator resolutions.
    pub fn from_config<S: ConfigSource + ?Sized>(
        source: &S,
        mut machine: M,
        status: &'s HomingStatus,
    ) -> Self {
        let steps_per_mm = machine.steps_per_mm();
        let settings = HomingSettings::resolve(source, &steps_per_mm);
        Self::new(settings, machine, status)
    }

    /// Get the resolved settings.
    #[inline]
    pub fn settings(&self) -> &HomingSettings {
        &self.settings
    }

    /// Get the machine context.
    #[inline]
    pub fn machine(&self) -> &M {
        &self.machine
    }

    /// Get the machine context mutably.
    #[inline]
    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    /// Release the machine context.
    pub fn into_machine(self) -> M {
        self.machine
    }

    /// Current state of the homing state machine.
    #[inline]
    pub fn state(&self) -> HomingState {
        self.status.state()
    }

    /// `true` while a homing cycle is in progress.
    #[inline]
    pub fn is_homing(&self) -> bool {
        self.status.is_homing()
    }

    /// Home every configured axis.
    pub fn run_homing_cycle_all(&mut self) -> Result<HomingOutcome> {
        self.run_homing_cycle(AxisMask::all(self.settings.axis_count()))
    }

    /// Home the axes selected by `axes`.
    ///
    /// Waits for queued motion to drain, then homes the configured groups
    /// in order (or every selected axis at once when unordered). On success
    /// the homing positions of the homed axes are reported to the machine
    /// once, after the last group. A halt skips the remaining groups and
    /// the report, leaving the machine unhomed. With homing disabled in
    /// the settings nothing moves and the outcome is `Aborted`.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected axis has no drive, or a pin operation
    /// fails. Status is back to [`HomingState::NotHoming`] either way.
    pub fn run_homing_cycle(&mut self, axes: AxisMask) -> Result<HomingOutcome> {
        if !self.settings.enabled {
            warn!("actuator homing disabled, cycle skipped");
            return Ok(HomingOutcome::Aborted);
        }
        info!("homing cycle start");
        self.machine.wait_for_idle();

        let selected = axes & AxisMask::all(self.settings.axis_count());
        let result = self.run_groups(selected);
        self.status.set(HomingState::NotHoming);

        let Some(homed) = result? else {
            warn!("homing cycle aborted by halt");
            return Ok(HomingOutcome::Aborted);
        };

        let mut position = ActuatorPosition::unhomed(self.settings.axis_count());
        for axis in homed.iter() {
            position.set(axis, self.settings.axes[axis].homing_position);
        }

        if !homed.is_empty() {
            self.machine.reset_actuator_position(&position);
        }
        for (axis, mm) in position.iter() {
            info!("axis {} homed at {}", axis, mm.0);
        }

        Ok(HomingOutcome::Completed(position))
    }

    /// Home each group in turn. `None` when a halt cut the sequence short.
    fn run_groups(&mut self, selected: AxisMask) -> Result<Option<AxisMask>> {
        for axis in selected.iter() {
            if self.machine.drive(axis).is_none() {
                return Err(MotorError::MissingDrive { axis: axis as u8 }.into());
            }
        }

        let groups = self.settings.order.groups(selected);
        let mut homed = AxisMask::EMPTY;
        for group in groups {
            let Some(done) = self.home(group)? else {
                return Ok(None);
            };
            if self.machine.is_halted() {
                return Ok(None);
            }
            homed = homed | done;
        }

        Ok(Some(homed))
    }

    /// Run the approach sequence for one group.
    ///
    /// Returns the axes that were homed, `None` when halted. Axes without a
    /// usable resolution are left out and never moved.
    fn home(&mut self, group: AxisMask) -> Result<Option<AxisMask>> {
        if self.machine.is_halted() {
            return Ok(None);
        }
        info!("homing axes {}", group);

        let Some((group, cadence)) = self.prepare_group(group)? else {
            return Ok(Some(AxisMask::EMPTY));
        };

        // Fast approach
        self.status.set(HomingState::MovingToEndstopFast);
        if self.approach(group, cadence.fast, cadence.steps_per_mm)? == PhaseEnd::Halted {
            return Ok(None);
        }

        if self.settings.approach == ApproachMode::FastOnly {
            self.status.set(HomingState::NotHoming);
            return Ok(Some(group));
        }

        // Back off the endstop
        self.status.set(HomingState::MovingBack);
        if self.retract(group, cadence.slow, cadence.steps_per_mm)? == PhaseEnd::Halted {
            return Ok(None);
        }

        // Precision approach
        self.status.set(HomingState::MovingToEndstopSlow);
        for axis in group.iter() {
            let direction = self.settings.axes[axis].home_direction;
            drive_for(&mut self.machine, axis)?.set_direction(direction)?;
        }
        if self.approach(group, cadence.slow, cadence.steps_per_mm)? == PhaseEnd::Halted {
            return Ok(None);
        }

        self.status.set(HomingState::NotHoming);
        Ok(Some(group))
    }

    /// Point every usable axis of the group at its endstop and find the
    /// shared cadence: slowest speeds and coarsest resolution govern.
    ///
    /// Returns the usable axes with their cadence, `None` when no axis of
    /// the group can be stepped.
    fn prepare_group(&mut self, group: AxisMask) -> Result<Option<(AxisMask, GroupCadence)>> {
        let mut usable = AxisMask::EMPTY;
        let mut cadence: Option<GroupCadence> = None;

        for axis in group.iter() {
            let config = &self.settings.axes[axis];
            let drive = drive_for(&mut self.machine, axis)?;
            let steps_per_mm = drive.steps_per_mm();
            if step_budget(steps_per_mm) == 0 {
                warn!("axis {}: unusable steps/mm {}, not homed", axis, steps_per_mm);
                continue;
            }
            drive.set_direction(config.home_direction)?;
            usable.insert(axis);

            cadence = Some(match cadence {
                None => GroupCadence {
                    fast: config.fast_rate,
                    slow: config.slow_rate,
                    steps_per_mm,
                },
                Some(c) => GroupCadence {
                    fast: c.fast.min(config.fast_rate),
                    slow: c.slow.min(config.slow_rate),
                    steps_per_mm: if steps_per_mm < c.steps_per_mm {
                        steps_per_mm
                    } else {
                        c.steps_per_mm
                    },
                },
            });
        }

        Ok(cadence.map(|cadence| (usable, cadence)))
    }

    /// Step every axis of the group toward its endstop until all report
    /// contact, the budget runs out, or a halt is raised.
    fn approach(
        &mut self,
        group: AxisMask,
        speed: MillimetersPerSec,
        steps_per_mm: f32,
    ) -> Result<PhaseEnd> {
        let Some(interval_ns) = step_interval_ns(steps_per_mm, speed) else {
            warn!("axes {}: no usable step cadence", group);
            return Ok(PhaseEnd::Exhausted);
        };
        let budget = step_budget(steps_per_mm);
        debug!("{}: {} ns per step", self.status.state(), interval_ns);

        let mut moved = true;
        let mut iteration = 0u64;
        while iteration < budget && moved {
            if self.machine.is_halted() {
                return Ok(PhaseEnd::Halted);
            }
            moved = false;

            for axis in group.iter() {
                let config = &self.settings.axes[axis];
                if endstop_reached(&mut self.machine, axis, config)? {
                    continue;
                }
                drive_for(&mut self.machine, axis)?.step()?;
                moved = true;
            }

            self.machine.delay_ns(interval_ns);
            iteration += 1;
        }

        if moved {
            warn!("axes {}: endstop not reached within {} steps", group, budget);
            Ok(PhaseEnd::Exhausted)
        } else {
            Ok(PhaseEnd::Settled)
        }
    }

    /// Step every axis of the group away from its endstop by its retract
    /// distance.
    fn retract(
        &mut self,
        group: AxisMask,
        speed: MillimetersPerSec,
        steps_per_mm: f32,
    ) -> Result<PhaseEnd> {
        let Some(interval_ns) = step_interval_ns(steps_per_mm, speed) else {
            warn!("axes {}: no usable step cadence", group);
            return Ok(PhaseEnd::Exhausted);
        };
        let budget = step_budget(steps_per_mm);
        debug!("{}: {} ns per step", self.status.state(), interval_ns);

        let mut retract_steps = [0u64; crate::config::MAX_AXES];
        for axis in group.iter() {
            let config = &self.settings.axes[axis];
            let drive = drive_for(&mut self.machine, axis)?;
            drive.set_direction(config.home_direction.reversed())?;
            retract_steps[axis] = config.retract.to_steps(drive.steps_per_mm()).abs();
        }

        let mut moved = true;
        let mut iteration = 0u64;
        while iteration < budget && moved {
            if self.machine.is_halted() {
                return Ok(PhaseEnd::Halted);
            }
            moved = false;

            for axis in group.iter() {
                if iteration < retract_steps[axis] {
                    drive_for(&mut self.machine, axis)?.step()?;
                    moved = true;
                }
            }

            self.machine.delay_ns(interval_ns);
            iteration += 1;
        }

        Ok(if moved { PhaseEnd::Exhausted } else { PhaseEnd::Settled })
    }
}

fn drive_for<M: Machine>(
    machine: &mut M,
    axis: usize,
) -> Result<&mut dyn crate::hal::ActuatorDrive> {
    machine
        .drive(axis)
        .ok_or_else(|| MotorError::MissingDrive { axis: axis as u8 }.into())
}

/// Check the endstop the axis homes against. An unwired endstop never fires.
fn endstop_reached<M: Machine>(machine: &mut M, axis: usize, config: &AxisConfig) -> Result<bool> {
    let side = EndstopSide::facing(config.home_direction);
    match machine.endstop(axis, side) {
        Some(endstop) => endstop.is_triggered(),
        None => Ok(false),
    }
}
