//! Axis selection bitmask.

use core::fmt;
use core::ops::{BitAnd, BitOr};

use crate::config::{AXIS_LETTERS, MAX_AXES};

/// Set of axis indices, one bit per axis (bit 0 is axis 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisMask(u8);

impl AxisMask {
    /// No axes.
    pub const EMPTY: Self = Self(0);

    /// Build from raw bits. Bits at or beyond [`MAX_AXES`] are dropped.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & ((1 << MAX_AXES) - 1))
    }

    /// The first `count` axes.
    #[inline]
    pub const fn all(count: usize) -> Self {
        let count = if count > MAX_AXES { MAX_AXES } else { count };
        Self::from_bits(((1u16 << count) - 1) as u8)
    }

    /// A single axis.
    #[inline]
    pub const fn single(axis: usize) -> Self {
        if axis < MAX_AXES {
            Self(1 << axis)
        } else {
            Self::EMPTY
        }
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if the mask selects `axis`.
    #[inline]
    pub const fn contains(self, axis: usize) -> bool {
        axis < MAX_AXES && (self.0 >> axis) & 1 == 1
    }

    /// Add `axis` to the mask.
    #[inline]
    pub fn insert(&mut self, axis: usize) {
        *self = *self | Self::single(axis);
    }

    /// Check if no axis is selected.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of selected axes.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Selected axis indices, lowest first.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..MAX_AXES).filter(move |&axis| self.contains(axis))
    }
}

impl BitOr for AxisMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for AxisMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for AxisMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in self.iter() {
            write!(f, "{}", AXIS_LETTERS[axis])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all() {
        assert_eq!(AxisMask::all(3).bits(), 0b111);
        assert_eq!(AxisMask::all(0), AxisMask::EMPTY);
        assert_eq!(AxisMask::all(99).len(), MAX_AXES);
    }

    #[test]
    fn test_contains_and_iter() {
        let mask = AxisMask::from_bits(0b101);
        assert!(mask.contains(0));
        assert!(!mask.contains(1));
        assert!(mask.contains(2));
        assert!(!mask.contains(42));
        let axes: heapless::Vec<usize, MAX_AXES> = mask.iter().collect();
        assert_eq!(axes.as_slice(), &[0, 2]);
    }

    #[test]
    fn test_high_bits_dropped() {
        assert_eq!(AxisMask::from_bits(0xFF).len(), MAX_AXES);
    }

    #[test]
    fn test_display_letters() {
        let mut out = heapless::String::<8>::new();
        core::fmt::write(&mut out, format_args!("{}", AxisMask::from_bits(0b110))).unwrap();
        assert_eq!(out.as_str(), "YZ");
    }
}
