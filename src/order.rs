//! Homing order.
//!
//! A homing order is written as one axis letter per configured axis, e.g.
//! `"ZXY"` to home Z first, then X, then Y. Anything else (wrong length,
//! unknown letter, repeated axis) means every axis homes at once.

use core::fmt;

use heapless::Vec;

use crate::config::{AXIS_LETTERS, MAX_AXES};
use crate::mask::AxisMask;

/// Sequence in which axis groups are homed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingOrder {
    /// Every selected axis homes simultaneously.
    #[default]
    Unordered,
    /// Groups homed one after another, first group first.
    Sequence(Vec<AxisMask, MAX_AXES>),
}

impl HomingOrder {
    /// Parse an order string for a machine with `axis_count` axes.
    ///
    /// Letters are case-insensitive and not trimmed. Invalid input yields
    /// [`HomingOrder::Unordered`].
    pub fn parse(order: &str, axis_count: usize) -> Self {
        let axis_count = axis_count.min(MAX_AXES);
        if axis_count == 0 || order.chars().count() != axis_count {
            return HomingOrder::Unordered;
        }

        let mut seen = AxisMask::EMPTY;
        let mut groups = Vec::new();
        for c in order.chars() {
            let c = c.to_ascii_uppercase();
            let Some(axis) = AXIS_LETTERS[..axis_count].iter().position(|&l| l == c) else {
                return HomingOrder::Unordered;
            };
            if seen.contains(axis) {
                return HomingOrder::Unordered;
            }
            seen.insert(axis);
            // Capacity is MAX_AXES and at most axis_count groups are pushed
            let _ = groups.push(AxisMask::single(axis));
        }

        HomingOrder::Sequence(groups)
    }

    /// Check for the all-at-once order.
    #[inline]
    pub fn is_unordered(&self) -> bool {
        matches!(self, HomingOrder::Unordered)
    }

    /// Groups to home for a request covering `selected`, in order.
    ///
    /// Unordered yields one group holding every selected axis. A sequence is
    /// filtered down to the selected axes; groups left empty are skipped.
    pub fn groups(&self, selected: AxisMask) -> Vec<AxisMask, MAX_AXES> {
        match self {
            HomingOrder::Unordered => {
                let mut groups = Vec::new();
                if !selected.is_empty() {
                    let _ = groups.push(selected);
                }
                groups
            }
            HomingOrder::Sequence(sequence) => sequence
                .iter()
                .map(|&group| group & selected)
                .filter(|group| !group.is_empty())
                .collect(),
        }
    }
}

impl fmt::Display for HomingOrder {
    /// Writes the order back as axis letters; unordered writes nothing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let HomingOrder::Sequence(groups) = self {
            for group in groups {
                write!(f, "{}", group)?;
            }
        }
        Ok(())
    }
}
