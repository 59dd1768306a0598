//! campus_nav_core - Pure no_std navigation logic for campus_nav
//!
//! This crate contains the platform-agnostic parts of the navigator: the
//! geodesy, the walking simulation, the route bookkeeping and the session
//! state machine. Nothing here performs I/O, owns a timer or logs; the
//! `campus_nav` crate drives these types from its event loop.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies
//! - **No I/O**: Collaborators (routing engine) are injected via traits
//! - **Explicit state**: Every mutation goes through a method on an owned value
//!
//! # Modules
//!
//! - [`geo`]: Coordinates, bounding boxes, haversine distance and bearing
//! - [`arrival`]: Remaining-distance evaluation and arrival classification
//! - [`simulation`]: Fixed-step walking simulation toward a destination
//! - [`route`]: Route service trait and the route tracker state machine
//! - [`mode`]: Navigation modes, legal transitions and position source kinds
//! - [`session`]: The mutable navigation session and its generation counter

#![no_std]

#[cfg(test)]
extern crate std;

pub mod arrival;
pub mod geo;
pub mod mode;
pub mod route;
pub mod session;
pub mod simulation;

pub use arrival::{DistanceEvaluator, Evaluation};
pub use geo::{BoundingBox, Coordinate, CoordinateError};
pub use mode::{NavigationMode, SourceKind, TransitionError};
pub use route::{RouteAction, RouteError, RouteHandle, RouteService, RouteState, RouteTracker};
pub use session::{Generation, NavigationSession};
pub use simulation::{SimulationConfig, SimulationStepper, StepOutcome, StepperError};
