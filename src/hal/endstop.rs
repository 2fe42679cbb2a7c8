//! Endstop sensors over embedded-hal input pins.

use embedded_hal::digital::InputPin;

use crate::config::PinDescriptor;
use crate::error::{MotorError, Result};

use super::EndstopSensor;

/// Endstop read from an `InputPin`.
///
/// A high level means triggered unless the pin is inverted.
pub struct PinEndstop<P: InputPin> {
    pin: P,
    inverted: bool,
}

impl<P: InputPin> PinEndstop<P> {
    /// Wrap a pin with active-high logic.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Wrap a pin using the logic configured by `descriptor`.
    pub fn from_descriptor(pin: P, descriptor: &PinDescriptor) -> Self {
        Self {
            pin,
            inverted: descriptor.inverted,
        }
    }

    /// Check if the logic is inverted.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Release the underlying pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> EndstopSensor for PinEndstop<P> {
    fn is_triggered(&mut self) -> Result<bool> {
        let high = self.pin.is_high().map_err(|_| MotorError::PinError)?;
        Ok(high != self.inverted)
    }
}

/// An endstop that is not wired. Never triggers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotConnected;

impl EndstopSensor for NotConnected {
    fn is_triggered(&mut self) -> Result<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    #[test]
    fn test_active_high() {
        let pin = PinMock::new(&[Transaction::get(State::Low), Transaction::get(State::High)]);
        let mut endstop = PinEndstop::new(pin);

        assert!(!endstop.is_triggered().unwrap());
        assert!(endstop.is_triggered().unwrap());

        endstop.release().done();
    }

    #[test]
    fn test_inverted_descriptor() {
        let descriptor: PinDescriptor = "1.28^!".parse().unwrap();
        let pin = PinMock::new(&[Transaction::get(State::Low), Transaction::get(State::High)]);
        let mut endstop = PinEndstop::from_descriptor(pin, &descriptor);
        assert!(endstop.is_inverted());

        assert!(endstop.is_triggered().unwrap());
        assert!(!endstop.is_triggered().unwrap());

        endstop.release().done();
    }

    #[test]
    fn test_not_connected_never_triggers() {
        let mut endstop = NotConnected;
        assert!(!endstop.is_triggered().unwrap());
    }
}
