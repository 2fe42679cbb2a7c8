//! Conversion between actuator and cartesian coordinates.
//!
//! Homing establishes actuator positions; the active arm solution turns
//! them into tool coordinates. Selected once from configuration.

mod cartesian;
mod gus_delta;

pub use cartesian::CartesianSolution;
pub use gus_delta::{GusDeltaSolution, DEFAULT_BASE_LENGTH, DEFAULT_VERTICAL_OFFSET};

use crate::config::ConfigSource;

/// Coordinate transform for one machine geometry.
pub trait ArmSolution {
    /// Actuator positions (mm) for a cartesian point (mm).
    fn cartesian_to_actuator(&self, cartesian: &[f32; 3]) -> [f32; 3];

    /// Cartesian point (mm) for actuator positions (mm).
    fn actuator_to_cartesian(&self, actuator: &[f32; 3]) -> [f32; 3];
}

/// Arm solution selected by the `arm_solution` key.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Kinematics {
    /// One actuator per cartesian axis.
    Cartesian(CartesianSolution),
    /// Three-arm delta.
    GusDelta(GusDeltaSolution),
}

impl Default for Kinematics {
    fn default() -> Self {
        Kinematics::Cartesian(CartesianSolution)
    }
}

impl Kinematics {
    /// Select the arm solution named in `source`.
    ///
    /// Absent or unknown names select cartesian.
    pub fn from_config<S: ConfigSource + ?Sized>(source: &S) -> Self {
        let name = source.text_or("arm_solution", "cartesian");
        if name.eq_ignore_ascii_case("gus_delta") {
            Kinematics::GusDelta(GusDeltaSolution::from_config(source))
        } else {
            if !name.eq_ignore_ascii_case("cartesian") {
                warn!("unknown arm solution, using cartesian");
            }
            Kinematics::default()
        }
    }
}

impl ArmSolution for Kinematics {
    fn cartesian_to_actuator(&self, cartesian: &[f32; 3]) -> [f32; 3] {
        match self {
            Kinematics::Cartesian(solution) => solution.cartesian_to_actuator(cartesian),
            Kinematics::GusDelta(solution) => solution.cartesian_to_actuator(cartesian),
        }
    }

    fn actuator_to_cartesian(&self, actuator: &[f32; 3]) -> [f32; 3] {
        match self {
            Kinematics::Cartesian(solution) => solution.actuator_to_cartesian(actuator),
            Kinematics::GusDelta(solution) => solution.actuator_to_cartesian(actuator),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigTable;

    #[test]
    fn test_default_is_cartesian() {
        let table = ConfigTable::new();
        assert_eq!(Kinematics::from_config(&table), Kinematics::Cartesian(CartesianSolution));
    }

    #[test]
    fn test_select_gus_delta() {
        let mut table = ConfigTable::new();
        table.set_text("arm_solution", "GUS_Delta");
        table.set_number("base_length", 300.0);

        match Kinematics::from_config(&table) {
            Kinematics::GusDelta(solution) => {
                assert_eq!(solution.base_length(), 300.0);
                assert_eq!(solution.vertical_offset(), DEFAULT_VERTICAL_OFFSET);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_name_falls_back() {
        let mut table = ConfigTable::new();
        table.set_text("arm_solution", "scara");
        assert_eq!(Kinematics::from_config(&table), Kinematics::default());
    }
}
