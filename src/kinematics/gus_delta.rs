//! Three-arm delta with hinges on an equilateral base triangle.
//!
//! Each actuator sets the length of an arm running from its hinge on the
//! base to the effector. Hinge A sits at the origin side of the base, B is
//! `base_length` along X from A, and C is the apex.

use libm::sqrtf;

use crate::config::ConfigSource;

use super::ArmSolution;

/// Default hinge-to-hinge distance in mm.
pub const DEFAULT_BASE_LENGTH: f32 = 250.0;

/// Default distance in mm between the hinge plane and Z = 0.
pub const DEFAULT_VERTICAL_OFFSET: f32 = 79.0;

const COS60: f32 = 0.5;
const SIN60: f32 = 0.866_025_4;
const SIN60_ON_3: f32 = 0.288_675_13;
const COTAN60: f32 = 0.577_350_26;

/// Delta geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GusDeltaSolution {
    base_length: f32,
    vertical_offset: f32,
}

impl Default for GusDeltaSolution {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_LENGTH, DEFAULT_VERTICAL_OFFSET)
    }
}

impl GusDeltaSolution {
    /// Create a solution for the given geometry.
    pub const fn new(base_length: f32, vertical_offset: f32) -> Self {
        Self {
            base_length,
            vertical_offset,
        }
    }

    /// Read `base_length` and `vertical_offset`.
    pub fn from_config<S: ConfigSource + ?Sized>(source: &S) -> Self {
        Self::new(
            source.number_or("base_length", DEFAULT_BASE_LENGTH),
            source.number_or("vertical_offset", DEFAULT_VERTICAL_OFFSET),
        )
    }

    /// Hinge-to-hinge distance in mm.
    #[inline]
    pub fn base_length(&self) -> f32 {
        self.base_length
    }

    /// Hinge plane height above Z = 0 in mm.
    #[inline]
    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }
}

#[inline]
fn sq(x: f32) -> f32 {
    x * x
}

impl ArmSolution for GusDeltaSolution {
    fn cartesian_to_actuator(&self, cartesian: &[f32; 3]) -> [f32; 3] {
        let [x, y, z] = *cartesian;
        let b = self.base_length;

        let z_sq = sq(z + self.vertical_offset);
        let y_sq_ab = sq(y + SIN60_ON_3 * b);
        let y_sq_c = sq(y - 2.0 * SIN60_ON_3 * b);

        [
            sqrtf(sq(x + COS60 * b) + y_sq_ab + z_sq),
            sqrtf(sq(x - COS60 * b) + y_sq_ab + z_sq),
            sqrtf(sq(x) + y_sq_c + z_sq),
        ]
    }

    fn actuator_to_cartesian(&self, actuator: &[f32; 3]) -> [f32; 3] {
        let [a, b_arm, c] = *actuator;
        let b = self.base_length;

        // Solve relative to hinge A
        let x = (sq(a) - sq(b_arm) + sq(b)) / (2.0 * b);
        let y = (sq(a) - sq(c) + sq(b)) / (2.0 * SIN60 * b) - COTAN60 * x;
        let z = sqrtf(sq(a) - sq(x) - sq(y));

        [x - COS60 * b, y - SIN60_ON_3 * b, z - self.vertical_offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: [f32; 3], b: [f32; 3]) {
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-2, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_centered_arms_equal() {
        let solution = GusDeltaSolution::default();
        let [a, b, c] = solution.cartesian_to_actuator(&[0.0, 0.0, 0.0]);

        assert!((a - b).abs() < 1e-3);
        assert!((a - c).abs() < 1e-3);
        // Hinge circumradius is base / sqrt(3)
        let expected = sqrtf(sq(DEFAULT_BASE_LENGTH / sqrtf(3.0)) + sq(DEFAULT_VERTICAL_OFFSET));
        assert!((a - expected).abs() < 1e-2);
    }

    #[test]
    fn test_round_trip() {
        let solution = GusDeltaSolution::new(250.0, 79.0);
        for point in [[0.0, 0.0, 0.0], [25.0, -40.0, 10.0], [-60.0, 35.5, 120.0]] {
            let actuator = solution.cartesian_to_actuator(&point);
            assert_close(solution.actuator_to_cartesian(&actuator), point);
        }
    }

    #[test]
    fn test_arm_lengths_grow_with_height() {
        let solution = GusDeltaSolution::default();
        let low = solution.cartesian_to_actuator(&[0.0, 0.0, 0.0]);
        let high = solution.cartesian_to_actuator(&[0.0, 0.0, 50.0]);
        assert!(high.iter().zip(low.iter()).all(|(h, l)| h > l));
    }
}
