//! Walking simulation
//!
//! Moves a simulated position toward a destination in fixed increments. The
//! stepper owns no timer: the caller invokes [`SimulationStepper::step`] once
//! per tick and passes in the current position explicitly.

mod stepper;

pub use stepper::{
    SimulationConfig, SimulationStepper, StepOutcome, StepperError, DEFAULT_STEP_DEG,
    DEFAULT_STOP_RADIUS_M, DEFAULT_TICK_INTERVAL_MS,
};
