//! Module-level homing settings - root configuration structure.

use heapless::Vec;

use crate::order::HomingOrder;

use super::axis::{AxisConfig, MAX_AXES};
use super::table::ConfigSource;
use super::validation::{sanitize_axis, validate_steps_per_mm};

/// How much of the approach sequence a homing group runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApproachMode {
    /// Fast approach, retract, then slow precision approach.
    #[default]
    Full,
    /// Stop after the fast approach.
    FastOnly,
}

/// Resolved configuration for the homing module.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingSettings {
    /// Module is enabled (`actuator_homing_enable`).
    pub enabled: bool,
    /// Per-axis parameters, indexed by axis.
    pub axes: Vec<AxisConfig, MAX_AXES>,
    /// Group sequence (`homing_order`).
    pub order: HomingOrder,
    /// Approach sequence (`actuator_homing_fast_approach_only`).
    pub approach: ApproachMode,
}

impl HomingSettings {
    /// Resolve settings for one axis per entry of `steps_per_mm`.
    ///
    /// Never fails: missing or malformed values fall back to defaults, and
    /// axes beyond [`MAX_AXES`] are ignored.
    pub fn resolve<S: ConfigSource + ?Sized>(source: &S, steps_per_mm: &[f32]) -> Self {
        let enabled = source.flag_or("actuator_homing_enable", true);

        let mut axes = Vec::new();
        for (axis, &spm) in steps_per_mm.iter().enumerate().take(MAX_AXES) {
            if validate_steps_per_mm(spm).is_err() {
                warn!("axis {}: unusable steps/mm {}", axis, spm);
            }
            let mut config = AxisConfig::resolve(source, axis, spm);
            sanitize_axis(axis, &mut config);
            let _ = axes.push(config);
        }

        let order = HomingOrder::parse(source.text_or("homing_order", ""), axes.len());

        let approach = if source.flag_or("actuator_homing_fast_approach_only", false) {
            ApproachMode::FastOnly
        } else {
            ApproachMode::Full
        };

        Self {
            enabled,
            axes,
            order,
            approach,
        }
    }

    /// Number of configured axes.
    #[inline]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Get an axis configuration by index.
    #[inline]
    pub fn axis(&self, axis: usize) -> Option<&AxisConfig> {
        self.axes.get(axis)
    }
}
