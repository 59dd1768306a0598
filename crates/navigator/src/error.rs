use campus_nav_core::{CoordinateError, RouteError, StepperError, TransitionError};

use crate::location::LocationError;

/// Errors reported by the navigator.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("Destination not found: {0}")]
    NotFound(String),

    #[error("No destination selected")]
    NoDestinationSelected,

    /// Non-fatal: the controller keeps the last known position.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Fatal to the current navigation; the session is aborted to idle.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoordinateError),

    #[error("Simulation can only be toggled while navigating")]
    NotNavigating,

    /// Timers and the simulation ticker need a running Tokio runtime.
    #[error("No Tokio runtime is running")]
    RuntimeUnavailable,

    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StepperError> for NavigationError {
    fn from(e: StepperError) -> Self {
        match e {
            StepperError::InvalidCoordinate(c) => NavigationError::InvalidInput(c),
            other => NavigationError::Config(other.to_string()),
        }
    }
}

impl From<LocationError> for NavigationError {
    fn from(e: LocationError) -> Self {
        NavigationError::LocationUnavailable(e.to_string())
    }
}
