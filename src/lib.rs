//! # actuator-homing
//!
//! Endstop homing for step/direction actuators with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Configuration-driven**: Per-axis speeds, retract distances, directions
//!   and homing order resolved from flat key-value settings (TOML on hosts)
//! - **embedded-hal 1.0**: `InputPin` endstops, `OutputPin` STEP/DIR, `DelayNs` cadence
//! - **no_std compatible**: Core library works without standard library
//! - **Grouped homing**: Axes home together or in configured groups
//! - **Two-speed approach**: Fast approach, retract, slow precision approach
//! - **Observable**: Homing status readable from anywhere through an atomic cell
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use actuator_homing::{AxisMask, HomingController, HomingStatus};
//!
//! static STATUS: HomingStatus = HomingStatus::new();
//!
//! // Load configuration from TOML
//! let table = actuator_homing::load_config("homing.toml")?;
//!
//! // `machine` implements `Machine`: drives, endstops, halt flag, delay
//! let mut homing = HomingController::from_config(&table, machine, &STATUS);
//!
//! // G28 with no axis letters
//! let outcome = homing.run_homing_cycle(AxisMask::all(3))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and `log` output
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod hal;
pub mod homing;
pub mod kinematics;
pub mod mask;
pub mod order;

// Re-exports for ergonomic API
pub use config::{AxisConfig, ConfigSource, ConfigTable, HomeDirection, HomingSettings};
pub use error::{Error, Result};
pub use hal::{ActuatorDrive, EndstopSensor, Machine};
pub use homing::{ActuatorPosition, HomingController, HomingOutcome, HomingState, HomingStatus};
pub use kinematics::{ArmSolution, Kinematics};
pub use mask::AxisMask;
pub use order::HomingOrder;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Millimeters, MillimetersPerSec, Steps};
