use super::ArmSolution;

/// Identity transform: actuator N drives cartesian axis N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CartesianSolution;

impl ArmSolution for CartesianSolution {
    #[inline]
    fn cartesian_to_actuator(&self, cartesian: &[f32; 3]) -> [f32; 3] {
        *cartesian
    }

    #[inline]
    fn actuator_to_cartesian(&self, actuator: &[f32; 3]) -> [f32; 3] {
        *actuator
    }
}
