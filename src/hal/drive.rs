//! STEP/DIR actuator drive.
//!
//! Generic over embedded-hal 1.0 pin and delay types.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Millimeters, Steps};
use crate::config::HomeDirection;
use crate::error::{MotorError, Result};

use super::ActuatorDrive;

/// STEP pulse width in microseconds.
pub const STEP_PULSE_US: u32 = 2;

/// Actuator driven through STEP and DIR pins.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider for the pulse width (must implement `DelayNs`)
pub struct StepDirDrive<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin (high = toward max, or inverted).
    dir_pin: DIR,

    /// Delay provider for the pulse width.
    delay: DELAY,

    /// Pulse-to-distance factor.
    steps_per_mm: f32,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Current direction (cached to avoid unnecessary pin writes).
    direction: Option<HomeDirection>,

    /// Absolute position since construction or the last reset.
    position: Steps,
}

impl<STEP, DIR, DELAY> StepDirDrive<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a drive with active-high direction logic.
    pub fn new(step_pin: STEP, dir_pin: DIR, delay: DELAY, steps_per_mm: f32) -> Self {
        Self {
            step_pin,
            dir_pin,
            delay,
            steps_per_mm,
            invert_direction: false,
            direction: None,
            position: Steps::default(),
        }
    }

    /// Invert direction pin logic.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Get current position in steps.
    #[inline]
    pub fn position_steps(&self) -> Steps {
        self.position
    }

    /// Get current position in millimeters.
    #[inline]
    pub fn position_mm(&self) -> Millimeters {
        self.position.to_millimeters(self.steps_per_mm)
    }

    /// Set the current position.
    pub fn set_position(&mut self, position: Millimeters) {
        self.position = position.to_steps(self.steps_per_mm);
    }

    /// Release the pins and delay.
    pub fn release(self) -> (STEP, DIR, DELAY) {
        (self.step_pin, self.dir_pin, self.delay)
    }
}

impl<STEP, DIR, DELAY> ActuatorDrive for StepDirDrive<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn set_direction(&mut self, direction: HomeDirection) -> Result<()> {
        if self.direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            HomeDirection::ToMax => !self.invert_direction,
            HomeDirection::ToMin => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.direction = Some(direction);
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        let direction = self.direction.unwrap_or_default();

        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.delay.delay_us(STEP_PULSE_US);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;

        self.position = match direction {
            HomeDirection::ToMax => self.position + Steps(1),
            HomeDirection::ToMin => self.position - Steps(1),
        };
        Ok(())
    }

    fn steps_per_mm(&self) -> f32 {
        self.steps_per_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_step_toward_min() {
        let step = PinMock::new(&[
            Transaction::set(State::High),
            Transaction::set(State::Low),
            Transaction::set(State::High),
            Transaction::set(State::Low),
        ]);
        let dir = PinMock::new(&[Transaction::set(State::Low)]);
        let mut drive = StepDirDrive::new(step, dir, NoopDelay::new(), 80.0);

        drive.set_direction(HomeDirection::ToMin).unwrap();
        // Cached, no second pin write
        drive.set_direction(HomeDirection::ToMin).unwrap();
        drive.step().unwrap();
        drive.step().unwrap();
        assert_eq!(drive.position_steps(), Steps(-2));

        let (mut step, mut dir, _) = drive.release();
        step.done();
        dir.done();
    }

    #[test]
    fn test_inverted_direction() {
        let step = PinMock::new(&[Transaction::set(State::High), Transaction::set(State::Low)]);
        let dir = PinMock::new(&[Transaction::set(State::Low)]);
        let mut drive =
            StepDirDrive::new(step, dir, NoopDelay::new(), 100.0).invert_direction(true);

        drive.set_direction(HomeDirection::ToMax).unwrap();
        drive.step().unwrap();
        assert_eq!(drive.position_steps(), Steps(1));

        let (mut step, mut dir, _) = drive.release();
        step.done();
        dir.done();
    }

    #[test]
    fn test_position_in_mm() {
        let step = PinMock::new(&[]);
        let dir = PinMock::new(&[]);
        let mut drive = StepDirDrive::new(step, dir, NoopDelay::new(), 80.0);

        drive.set_position(Millimeters(12.5));
        assert_eq!(drive.position_steps(), Steps(1000));
        assert!((drive.position_mm().value() - 12.5).abs() < 1e-4);

        let (mut step, mut dir, _) = drive.release();
        step.done();
        dir.done();
    }
}
