//! Configuration module for actuator-homing.
//!
//! Resolves flat key-value configuration (loaded from TOML with the `std`
//! feature, or built by hand) into per-axis homing parameters. Resolution
//! never fails; unusable values degrade to documented defaults.

mod axis;
mod pin;
mod settings;
mod table;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{
    AxisConfig, HomeDirection, AXIS_KEY_PREFIXES, AXIS_LETTERS, DEFAULT_AXIS_MAX,
    DEFAULT_AXIS_MIN, MAX_AXES,
};
pub use pin::{PinDescriptor, PinParseError, Pull};
pub use settings::{ApproachMode, HomingSettings};
pub use table::{ConfigSource, ConfigTable, ConfigValue, MAX_CONFIG_KEYS, MAX_KEY_LEN, MAX_TEXT_LEN};
pub use validation::{
    sanitize_axis, validate_axis, validate_steps_per_mm, FALLBACK_FAST_RATE, FALLBACK_RETRACT,
    FALLBACK_SLOW_RATE,
};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Millimeters, MillimetersPerSec, Steps};
