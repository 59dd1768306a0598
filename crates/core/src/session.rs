//! Navigation session state
//!
//! The session is the single mutable aggregate of a navigation. It is owned
//! by one controller and every change goes through a method here.
//!
//! Each session carries a [`Generation`]. Work scheduled against the session
//! (timer ticks, provider callbacks, the loading delay) is tagged with the
//! generation current at scheduling time; bumping the generation on teardown
//! makes every straggler recognisably stale.

use crate::arrival::Evaluation;
use crate::geo::{Coordinate, CoordinateError};
use crate::mode::{NavigationMode, TransitionError};

/// Monotonic session epoch used to discard late events
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

/// Mutable state of the current navigation
#[derive(Clone, Debug)]
pub struct NavigationSession {
    position: Coordinate,
    destination: Option<Coordinate>,
    mode: NavigationMode,
    remaining_m: Option<f64>,
    bearing_deg: Option<f64>,
    following: bool,
    generation: Generation,
}

impl NavigationSession {
    /// Create an idle session at `position`
    pub fn new(position: Coordinate) -> Self {
        Self {
            position,
            destination: None,
            mode: NavigationMode::Idle,
            remaining_m: None,
            bearing_deg: None,
            following: true,
            generation: Generation::default(),
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Remaining distance in meters, `None` until first computed
    pub fn remaining_m(&self) -> Option<f64> {
        self.remaining_m
    }

    pub fn bearing_deg(&self) -> Option<f64> {
        self.bearing_deg
    }

    /// Camera-follow flag; carried for presentation only
    pub fn following(&self) -> bool {
        self.following
    }

    pub fn set_following(&mut self, following: bool) {
        self.following = following;
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// True if work tagged with `generation` still belongs to this session
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Invalidate all outstanding work and return the new generation
    pub fn invalidate(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.generation
    }

    /// Move to `next` if the state machine allows it
    ///
    /// Returns the previous mode.
    pub fn transition(&mut self, next: NavigationMode) -> Result<NavigationMode, TransitionError> {
        if !self.mode.can_transition_to(next) {
            return Err(TransitionError {
                from: self.mode,
                to: next,
            });
        }
        Ok(core::mem::replace(&mut self.mode, next))
    }

    /// Enter `Loading` toward `destination`, clearing previous results
    pub fn begin(&mut self, destination: Coordinate) -> Result<Generation, TransitionError> {
        self.transition(NavigationMode::Loading)?;
        self.destination = Some(destination);
        self.remaining_m = None;
        self.bearing_deg = None;
        Ok(self.invalidate())
    }

    /// Replace the current position after validating it
    pub fn set_position(&mut self, position: Coordinate) -> Result<(), CoordinateError> {
        position.validate()?;
        self.position = position;
        Ok(())
    }

    pub fn record(&mut self, evaluation: &Evaluation) {
        self.remaining_m = Some(evaluation.distance_m);
        self.bearing_deg = Some(evaluation.bearing_deg);
    }

    /// Discard the navigation: back to `Idle`, destination and results
    /// cleared, position kept, outstanding work invalidated
    pub fn reset(&mut self) -> Generation {
        self.mode = NavigationMode::Idle;
        self.destination = None;
        self.remaining_m = None;
        self.bearing_deg = None;
        self.invalidate()
    }
}
