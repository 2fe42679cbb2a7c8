//! Pulse cadence and iteration budgets.

use crate::config::units::MillimetersPerSec;

/// Iteration budget per millimeter-per-step of resolution.
///
/// Large enough to cross the full travel of any supported machine at the
/// finest resolution, while still bounding a phase whose endstop never fires.
pub const STEP_BUDGET_FACTOR: f32 = 10_000_000.0;

/// Spacing between step iterations in microseconds.
///
/// `None` when the resolution or speed cannot produce a finite cadence.
pub fn step_interval_us(steps_per_mm: f32, speed: MillimetersPerSec) -> Option<f32> {
    let steps_per_sec = speed.to_steps_per_sec(steps_per_mm);
    if !(steps_per_sec.is_finite() && steps_per_sec > 0.0) {
        return None;
    }
    let interval = 1_000_000.0 / steps_per_sec;
    interval.is_finite().then_some(interval)
}

/// Spacing between step iterations in whole nanoseconds, at least 1.
pub fn step_interval_ns(steps_per_mm: f32, speed: MillimetersPerSec) -> Option<u32> {
    let us = step_interval_us(steps_per_mm, speed)?;
    let ns = us * 1000.0;
    Some(if ns >= u32::MAX as f32 {
        u32::MAX
    } else if ns < 1.0 {
        1
    } else {
        ns as u32
    })
}

/// Maximum number of iterations an approach phase may run.
pub fn step_budget(steps_per_mm: f32) -> u64 {
    let budget = STEP_BUDGET_FACTOR * steps_per_mm;
    if budget.is_finite() && budget > 0.0 {
        budget as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_interval_values() {
        // 80 steps/mm at 50 mm/s = 4000 steps/s = 250 us
        let us = step_interval_us(80.0, MillimetersPerSec(50.0)).unwrap();
        assert!((us - 250.0).abs() < 1e-3);
        assert_eq!(step_interval_ns(80.0, MillimetersPerSec(50.0)), Some(250_000));
    }

    #[test]
    fn test_unusable_cadence() {
        assert!(step_interval_us(0.0, MillimetersPerSec(50.0)).is_none());
        assert!(step_interval_us(80.0, MillimetersPerSec(0.0)).is_none());
        assert!(step_interval_us(80.0, MillimetersPerSec(f32::NAN)).is_none());
        assert!(step_interval_ns(-80.0, MillimetersPerSec(10.0)).is_none());
    }

    #[test]
    fn test_interval_ns_clamped() {
        assert_eq!(step_interval_ns(1.0e6, MillimetersPerSec(1.0e6)), Some(1));
        assert_eq!(step_interval_ns(1.0e-6, MillimetersPerSec(1.0e-6)), Some(u32::MAX));
    }

    #[test]
    fn test_step_budget() {
        assert_eq!(step_budget(80.0), 800_000_000);
        assert_eq!(step_budget(0.0), 0);
        assert_eq!(step_budget(f32::NAN), 0);
    }

    proptest! {
        #[test]
        fn interval_positive_and_inverse_to_speed(
            steps_per_mm in 1.0f32..5000.0,
            speed in 0.1f32..500.0,
        ) {
            let base = step_interval_us(steps_per_mm, MillimetersPerSec(speed)).unwrap();
            let doubled = step_interval_us(steps_per_mm, MillimetersPerSec(speed * 2.0)).unwrap();

            prop_assert!(base > 0.0);
            prop_assert!(doubled > 0.0);
            prop_assert!((base / doubled - 2.0).abs() < 1e-3);
        }
    }
}
