//! Homing cycle: state machine, status and outcome.
//!
//! A cycle drives each group of axes toward its endstops in up to three
//! phases (fast approach, retract, slow approach), then reports the
//! configured homing positions to the machine in a single call.

mod controller;
mod position;
mod state;
pub mod timing;

pub use controller::HomingController;
pub use position::{ActuatorPosition, HomingOutcome};
pub use state::{HomingState, HomingStatus};
