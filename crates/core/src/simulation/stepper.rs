//! Fixed-step simulation stepper

use core::fmt;

use libm::sqrt;

use crate::geo::{haversine_distance, Coordinate, CoordinateError};

/// Distance moved per tick, in degrees along the direction vector
pub const DEFAULT_STEP_DEG: f64 = 0.00005;
/// Period between ticks in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
/// Distance below which the stepper stops, in meters
pub const DEFAULT_STOP_RADIUS_M: f64 = 10.0;

/// Simulation parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Step length per tick in degrees (must be finite and > 0)
    pub step_deg: f64,
    /// Tick period in milliseconds (must be > 0)
    pub tick_interval_ms: u64,
    /// Stop radius in meters (strict `<`)
    pub stop_radius_m: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_deg: DEFAULT_STEP_DEG,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            stop_radius_m: DEFAULT_STOP_RADIUS_M,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), StepperError> {
        if !self.step_deg.is_finite() || self.step_deg <= 0.0 {
            return Err(StepperError::InvalidStepSize(self.step_deg));
        }
        if self.tick_interval_ms == 0 {
            return Err(StepperError::InvalidTickInterval);
        }
        if !self.stop_radius_m.is_finite() || self.stop_radius_m < 0.0 {
            return Err(StepperError::InvalidStopRadius(self.stop_radius_m));
        }
        Ok(())
    }
}

/// Result of a single tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// The simulated position advanced to this coordinate
    Moved(Coordinate),
    /// Within the stop radius (or exactly on the destination); stepper stopped
    Arrived,
}

/// Stepper errors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepperError {
    InvalidStepSize(f64),
    InvalidTickInterval,
    InvalidStopRadius(f64),
    /// A position or destination handed to [`SimulationStepper::step`] was rejected
    InvalidCoordinate(CoordinateError),
}

impl fmt::Display for StepperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepperError::InvalidStepSize(step) => {
                write!(f, "simulation step must be finite and positive, got {}", step)
            }
            StepperError::InvalidTickInterval => write!(f, "simulation tick interval must be > 0"),
            StepperError::InvalidStopRadius(radius) => {
                write!(f, "simulation stop radius must be finite and >= 0, got {}", radius)
            }
            StepperError::InvalidCoordinate(e) => write!(f, "invalid simulation input: {}", e),
        }
    }
}

impl core::error::Error for StepperError {}

impl From<CoordinateError> for StepperError {
    fn from(e: CoordinateError) -> Self {
        StepperError::InvalidCoordinate(e)
    }
}

/// Advances a simulated position toward a destination by fixed increments
///
/// # Lifecycle
///
/// 1. `start()` - begin accepting ticks (no-op if already running)
/// 2. `step(position, destination)` - once per tick
/// 3. `stop()` - explicit stop (no-op if not running); also happens
///    implicitly on arrival or invalid input
///
/// A step that would overshoot the destination lands exactly on it, so the
/// walk reaches the stop condition in a finite number of ticks for any
/// positive step size.
#[derive(Debug, Clone)]
pub struct SimulationStepper {
    config: SimulationConfig,
    running: bool,
    ticks: u32,
}

impl SimulationStepper {
    pub fn new(config: SimulationConfig) -> Result<Self, StepperError> {
        config.validate()?;
        Ok(Self {
            config,
            running: false,
            ticks: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Start ticking. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.ticks = 0;
        true
    }

    /// Stop ticking. Returns `false` if not running.
    pub fn stop(&mut self) -> bool {
        core::mem::replace(&mut self.running, false)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of `Moved` outcomes since the last `start()`
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Advance one tick
    ///
    /// Returns `Ok(None)` when the stepper is not running. Invalid input stops
    /// the stepper and returns an error instead of producing a position.
    pub fn step(
        &mut self,
        position: Coordinate,
        destination: Coordinate,
    ) -> Result<Option<StepOutcome>, StepperError> {
        if !self.running {
            return Ok(None);
        }

        if let Err(e) = position.validate().and_then(|_| destination.validate()) {
            self.running = false;
            return Err(e.into());
        }

        let d_lat = destination.latitude - position.latitude;
        let d_lon = destination.longitude - position.longitude;
        let magnitude = sqrt(d_lat * d_lat + d_lon * d_lon);

        if magnitude == 0.0 || haversine_distance(position, destination) < self.config.stop_radius_m
        {
            self.running = false;
            return Ok(Some(StepOutcome::Arrived));
        }

        let next = if magnitude <= self.config.step_deg {
            destination
        } else {
            let scale = self.config.step_deg / magnitude;
            Coordinate::new(
                position.latitude + d_lat * scale,
                position.longitude + d_lon * scale,
            )
        };

        self.ticks = self.ticks.saturating_add(1);
        Ok(Some(StepOutcome::Moved(next)))
    }
}
