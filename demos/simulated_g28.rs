//! Example: Home a simulated three-axis machine.
//!
//! This example demonstrates how to:
//! - Resolve homing settings from a TOML document
//! - Wire endstops from the configured pin descriptors
//! - Run a full homing cycle, the way `G28` does
//!
//! Run with: `cargo run --example simulated_g28`

use std::cell::Cell;
use std::rc::Rc;

use actuator_homing::{
    config::HomingSettings,
    error::Result,
    hal::{
        ActuatorDrive, EndstopSensor, EndstopSide, HaltSignal, Machine, MotionGate, PinEndstop,
        PositionSink, StepDirDrive,
    },
    parse_config, ActuatorPosition, HomingController, HomingOutcome, HomingStatus,
};

const CONFIG: &str = r#"
alpha_min_endstop = "1.24^"
beta_max_endstop = "1.27^!"
gamma_min_endstop = "1.28^"

beta_homing_direction = "home_to_max"
beta_max = 200

alpha_fast_homing_rate_mm_s = 100
gamma_homing_retract_mm = 1

homing_order = "ZXY"
"#;

const STEPS_PER_MM: [f32; 3] = [80.0, 80.0, 400.0];

static STATUS: HomingStatus = HomingStatus::new();

/// Simulated DIR pin.
struct DirPin {
    high: Rc<Cell<bool>>,
}

impl embedded_hal::digital::ErrorType for DirPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for DirPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.high.set(true);
        Ok(())
    }
}

/// Simulated STEP pin moving a carriage one step per rising edge.
struct StepPin {
    dir_high: Rc<Cell<bool>>,
    position: Rc<Cell<i64>>,
}

impl embedded_hal::digital::ErrorType for StepPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for StepPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        let delta = if self.dir_high.get() { 1 } else { -1 };
        self.position.set(self.position.get() + delta);
        Ok(())
    }
}

/// Simulated limit switch closing at a carriage position.
struct SwitchPin {
    position: Rc<Cell<i64>>,
    side: EndstopSide,
    at: i64,
    active_low: bool,
}

impl SwitchPin {
    fn closed(&self) -> bool {
        match self.side {
            EndstopSide::Min => self.position.get() <= self.at,
            EndstopSide::Max => self.position.get() >= self.at,
        }
    }
}

impl embedded_hal::digital::ErrorType for SwitchPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for SwitchPin {
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(self.closed() != self.active_low)
    }

    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Pulse-width delay; simulated time does not need to pass.
struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

type Drive = StepDirDrive<StepPin, DirPin, NoDelay>;

struct Axis {
    drive: Drive,
    endstop: Option<(EndstopSide, PinEndstop<SwitchPin>)>,
    carriage: Rc<Cell<i64>>,
}

/// Three-axis machine with a simulated clock.
struct DemoMachine {
    axes: Vec<Axis>,
    elapsed_ns: u64,
    origin: Option<ActuatorPosition>,
}

impl DemoMachine {
    /// Build axes with the endstop each one homes against, placed at
    /// `switch_at` steps, carriages starting at `start` steps.
    fn new(settings: &HomingSettings, start: [i64; 3], switch_at: [i64; 3]) -> Self {
        let axes = settings
            .axes
            .iter()
            .enumerate()
            .map(|(axis, config)| {
                let carriage = Rc::new(Cell::new(start[axis]));
                let dir_high = Rc::new(Cell::new(false));
                let drive = StepDirDrive::new(
                    StepPin {
                        dir_high: Rc::clone(&dir_high),
                        position: Rc::clone(&carriage),
                    },
                    DirPin { high: dir_high },
                    NoDelay,
                    STEPS_PER_MM[axis],
                );

                let side = EndstopSide::facing(config.home_direction);
                let endstop = config.homing_endstop().map(|descriptor| {
                    let pin = SwitchPin {
                        position: Rc::clone(&carriage),
                        side,
                        at: switch_at[axis],
                        active_low: descriptor.inverted,
                    };
                    (side, PinEndstop::from_descriptor(pin, descriptor))
                });

                Axis {
                    drive,
                    endstop,
                    carriage,
                }
            })
            .collect();

        Self {
            axes,
            elapsed_ns: 0,
            origin: None,
        }
    }
}

impl MotionGate for DemoMachine {
    fn wait_for_idle(&mut self) {
        println!("  motion queue drained");
    }
}

impl PositionSink for DemoMachine {
    fn reset_actuator_position(&mut self, position: &ActuatorPosition) {
        for (axis, mm) in position.iter() {
            self.axes[axis].drive.set_position(mm);
        }
        self.origin = Some(position.clone());
    }
}

impl HaltSignal for DemoMachine {
    fn is_halted(&self) -> bool {
        false
    }
}

impl embedded_hal::delay::DelayNs for DemoMachine {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }
}

impl Machine for DemoMachine {
    fn axis_count(&self) -> usize {
        self.axes.len()
    }

    fn drive(&mut self, axis: usize) -> Option<&mut dyn ActuatorDrive> {
        let axis = self.axes.get_mut(axis)?;
        Some(&mut axis.drive as &mut dyn ActuatorDrive)
    }

    fn endstop(&mut self, axis: usize, side: EndstopSide) -> Option<&mut dyn EndstopSensor> {
        match self.axes.get_mut(axis)?.endstop.as_mut() {
            Some((wired, endstop)) if *wired == side => Some(endstop as &mut dyn EndstopSensor),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    println!("=== Simulated G28 Example ===\n");

    let table = parse_config(CONFIG)?;
    let settings = HomingSettings::resolve(&table, &STEPS_PER_MM);

    println!("Homing order: {}", settings.order);
    for (axis, config) in settings.axes.iter().enumerate() {
        println!(
            "  axis {}: {:?}, fast {:.1} mm/s, slow {:.1} mm/s, retract {:.2} mm",
            axis,
            config.home_direction,
            config.fast_rate.value(),
            config.slow_rate.value(),
            config.retract.value(),
        );
    }

    // Switches at X 0, Y 200 mm, Z 0; carriages somewhere in between
    let machine = DemoMachine::new(&settings, [2400, 12000, 8000], [0, 16000, 0]);
    let mut homing = HomingController::new(settings, machine, &STATUS);

    println!("\nRunning homing cycle...");
    let outcome = homing.run_homing_cycle_all()?;

    let machine = homing.into_machine();
    match outcome {
        HomingOutcome::Completed(position) => {
            println!("\nHomed in {:.3} s (simulated)", machine.elapsed_ns as f64 * 1e-9);
            for (axis, mm) in position.iter() {
                let drive = &machine.axes[axis].drive;
                println!(
                    "  axis {}: {:.2} mm (carriage at step {}, drive at {:.2} mm)",
                    axis,
                    mm.value(),
                    machine.axes[axis].carriage.get(),
                    drive.position_mm().value(),
                );
            }
            println!("  origin reported: {}", machine.origin.is_some());
        }
        HomingOutcome::Aborted => println!("\nHoming aborted"),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
