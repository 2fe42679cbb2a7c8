//! Simulated machine for driving homing cycles in integration tests.
//!
//! Each axis is a step counter; its endstops trigger at fixed step
//! positions. Every busy-wait closes one loop iteration in the trace, which
//! records the axes stepped since the previous one and the homing state.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use actuator_homing::hal::{
    ActuatorDrive, EndstopSensor, EndstopSide, HaltSignal, Machine, MotionGate, PositionSink,
};
use actuator_homing::error::MotorError;
use actuator_homing::{ActuatorPosition, AxisMask, HomeDirection, HomingState, HomingStatus, Result};
use embedded_hal::delay::DelayNs;

/// One iteration of a homing loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Iteration {
    /// Axes that received a pulse.
    pub stepped: AxisMask,
    /// Homing state while the iteration ran.
    pub state: HomingState,
    /// Busy-wait length that closed the iteration.
    pub interval_ns: u32,
}

#[derive(Debug, Default)]
struct Trace {
    pulses: u64,
    pending: AxisMask,
    iterations: Vec<Iteration>,
}

/// Step counter standing in for a STEP/DIR drive.
pub struct SimDrive {
    axis: usize,
    steps_per_mm: f32,
    direction: HomeDirection,
    position: Rc<Cell<i64>>,
    trace: Rc<RefCell<Trace>>,
    pulses: u64,
    directions: Vec<HomeDirection>,
}

impl ActuatorDrive for SimDrive {
    fn set_direction(&mut self, direction: HomeDirection) -> Result<()> {
        if self.directions.last() != Some(&direction) {
            self.directions.push(direction);
        }
        self.direction = direction;
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        let delta = match self.direction {
            HomeDirection::ToMax => 1,
            HomeDirection::ToMin => -1,
        };
        self.position.set(self.position.get() + delta);
        self.pulses += 1;

        let mut trace = self.trace.borrow_mut();
        trace.pulses += 1;
        trace.pending.insert(self.axis);
        Ok(())
    }

    fn steps_per_mm(&self) -> f32 {
        self.steps_per_mm
    }
}

/// Endstop that fires once its axis reaches a step position.
pub struct SimEndstop {
    side: EndstopSide,
    at: i64,
    position: Rc<Cell<i64>>,
    faulty: bool,
}

impl EndstopSensor for SimEndstop {
    fn is_triggered(&mut self) -> Result<bool> {
        if self.faulty {
            return Err(MotorError::PinError.into());
        }
        let position = self.position.get();
        Ok(match self.side {
            EndstopSide::Min => position <= self.at,
            EndstopSide::Max => position >= self.at,
        })
    }
}

/// Description of one simulated axis.
#[derive(Debug, Clone, Copy)]
pub struct AxisSpec {
    steps_per_mm: f32,
    start: i64,
    min_at: Option<i64>,
    max_at: Option<i64>,
    faulty: bool,
}

impl AxisSpec {
    /// Axis at step 0 with a min endstop at step 0 and no max endstop.
    pub fn new(steps_per_mm: f32) -> Self {
        Self {
            steps_per_mm,
            start: 0,
            min_at: Some(0),
            max_at: None,
            faulty: false,
        }
    }

    pub fn start(mut self, steps: i64) -> Self {
        self.start = steps;
        self
    }

    pub fn min_at(mut self, steps: Option<i64>) -> Self {
        self.min_at = steps;
        self
    }

    pub fn max_at(mut self, steps: Option<i64>) -> Self {
        self.max_at = steps;
        self
    }

    /// Endstops fail every read with a pin error.
    pub fn faulty(mut self) -> Self {
        self.faulty = true;
        self
    }
}

struct SimAxis {
    drive: SimDrive,
    min: Option<SimEndstop>,
    max: Option<SimEndstop>,
}

/// Machine context backed by simulated axes.
pub struct SimMachine {
    axes: Vec<Option<SimAxis>>,
    trace: Rc<RefCell<Trace>>,
    status: Option<&'static HomingStatus>,
    halt_after: Option<u64>,
    idle_waits: Vec<u64>,
    reports: Vec<ActuatorPosition>,
}

impl SimMachine {
    pub fn new() -> Self {
        Self {
            axes: Vec::new(),
            trace: Rc::new(RefCell::new(Trace::default())),
            status: None,
            halt_after: None,
            idle_waits: Vec::new(),
            reports: Vec::new(),
        }
    }

    /// Add the next axis.
    pub fn axis(mut self, spec: AxisSpec) -> Self {
        let axis = self.axes.len();
        let position = Rc::new(Cell::new(spec.start));
        let endstop = |side, at: Option<i64>| {
            at.map(|at| SimEndstop {
                side,
                at,
                position: Rc::clone(&position),
                faulty: spec.faulty,
            })
        };
        let min = endstop(EndstopSide::Min, spec.min_at);
        let max = endstop(EndstopSide::Max, spec.max_at);

        self.axes.push(Some(SimAxis {
            drive: SimDrive {
                axis,
                steps_per_mm: spec.steps_per_mm,
                direction: HomeDirection::ToMin,
                position,
                trace: Rc::clone(&self.trace),
                pulses: 0,
                directions: Vec::new(),
            },
            min,
            max,
        }));
        self
    }

    /// Add an axis slot with no registered drive.
    pub fn missing_axis(mut self) -> Self {
        self.axes.push(None);
        self
    }

    /// Raise the halt flag once `pulses` step pulses have been emitted.
    pub fn halt_after(mut self, pulses: u64) -> Self {
        self.halt_after = Some(pulses);
        self
    }

    /// Record the state of `status` with every iteration.
    pub fn observe(mut self, status: &'static HomingStatus) -> Self {
        self.status = Some(status);
        self
    }

    fn sim_axis(&self, axis: usize) -> &SimAxis {
        self.axes[axis].as_ref().expect("axis has no drive")
    }

    /// Pulses emitted on `axis`.
    pub fn pulses(&self, axis: usize) -> u64 {
        self.sim_axis(axis).drive.pulses
    }

    /// Current step position of `axis`.
    pub fn position(&self, axis: usize) -> i64 {
        self.sim_axis(axis).drive.position.get()
    }

    /// Distinct directions `axis` was set to, in order.
    pub fn directions(&self, axis: usize) -> Vec<HomeDirection> {
        self.sim_axis(axis).drive.directions.clone()
    }

    /// Pulses emitted on all axes.
    pub fn total_pulses(&self) -> u64 {
        self.trace.borrow().pulses
    }

    pub fn iterations(&self) -> Vec<Iteration> {
        self.trace.borrow().iterations.clone()
    }

    /// Iterations run in `state`.
    pub fn iterations_in(&self, state: HomingState) -> Vec<Iteration> {
        self.iterations()
            .into_iter()
            .filter(|it| it.state == state)
            .collect()
    }

    /// Distinct states seen across the trace, in order.
    pub fn phases(&self) -> Vec<HomingState> {
        let mut phases: Vec<HomingState> = Vec::new();
        for it in self.iterations() {
            if phases.last() != Some(&it.state) {
                phases.push(it.state);
            }
        }
        phases
    }

    /// Total pulse count at each wait for idle.
    pub fn idle_waits(&self) -> &[u64] {
        &self.idle_waits
    }

    /// Positions reported through the position sink.
    pub fn reports(&self) -> &[ActuatorPosition] {
        &self.reports
    }
}

impl MotionGate for SimMachine {
    fn wait_for_idle(&mut self) {
        self.idle_waits.push(self.total_pulses());
    }
}

impl PositionSink for SimMachine {
    fn reset_actuator_position(&mut self, position: &ActuatorPosition) {
        self.reports.push(position.clone());
    }
}

impl HaltSignal for SimMachine {
    fn is_halted(&self) -> bool {
        self.halt_after
            .map_or(false, |limit| self.trace.borrow().pulses >= limit)
    }
}

impl DelayNs for SimMachine {
    fn delay_ns(&mut self, ns: u32) {
        let state = self.status.map(HomingStatus::state).unwrap_or_default();
        let mut trace = self.trace.borrow_mut();
        let stepped = core::mem::take(&mut trace.pending);
        trace.iterations.push(Iteration {
            stepped,
            state,
            interval_ns: ns,
        });
    }
}

impl Machine for SimMachine {
    fn axis_count(&self) -> usize {
        self.axes.len()
    }

    fn drive(&mut self, axis: usize) -> Option<&mut dyn ActuatorDrive> {
        let axis = self.axes.get_mut(axis)?.as_mut()?;
        Some(&mut axis.drive as &mut dyn ActuatorDrive)
    }

    fn endstop(&mut self, axis: usize, side: EndstopSide) -> Option<&mut dyn EndstopSensor> {
        let axis = self.axes.get_mut(axis)?.as_mut()?;
        let endstop: &mut dyn EndstopSensor = match side {
            EndstopSide::Min => axis.min.as_mut()?,
            EndstopSide::Max => axis.max.as_mut()?,
        };
        Some(endstop)
    }
}

/// A status cell that outlives the test, so the machine can observe it.
pub fn leaked_status() -> &'static HomingStatus {
    Box::leak(Box::new(HomingStatus::new()))
}
