//! Error types for actuator-homing.
//!
//! Configuration values never produce errors; they degrade to defaults. What
//! remains is whole-document loading failures and hardware faults raised by
//! the capability layer.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all actuator-homing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration loading or validation error
    Config(ConfigError),
    /// Actuator or endstop hardware error
    Motor(MotorError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Fast homing rate must be finite and > 0
    InvalidFastRate(f32),
    /// Slow homing rate must be finite and > 0
    InvalidSlowRate(f32),
    /// Retract distance must be finite and >= 0
    InvalidRetract(f32),
    /// Steps per millimeter must be finite and > 0
    InvalidStepsPerMm(f32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Hardware errors raised while driving actuators or reading endstops.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// No actuator drive is registered for the axis
    MissingDrive {
        /// Axis index
        axis: u8,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidFastRate(v) => {
                write!(f, "Invalid fast homing rate: {} mm/s. Must be > 0", v)
            }
            ConfigError::InvalidSlowRate(v) => {
                write!(f, "Invalid slow homing rate: {} mm/s. Must be > 0", v)
            }
            ConfigError::InvalidRetract(v) => {
                write!(f, "Invalid homing retract: {} mm. Must be >= 0", v)
            }
            ConfigError::InvalidStepsPerMm(v) => {
                write!(f, "Invalid steps per mm: {}. Must be > 0", v)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::MissingDrive { axis } => {
                write!(f, "No actuator drive registered for axis {}", axis)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}
