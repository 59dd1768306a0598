//! Remaining distance and arrival classification
//!
//! The evaluator's radius is the user-facing arrival threshold. It is kept
//! separate from the simulation stop radius in
//! [`SimulationConfig`](crate::simulation::SimulationConfig), which is tighter.

use crate::geo::{distance_bearing, haversine_distance, Coordinate, CoordinateError};

/// Default user-facing arrival radius in meters
pub const DEFAULT_ARRIVAL_RADIUS_M: f64 = 20.0;

/// Result of evaluating a position against a destination
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    /// Great-circle distance to the destination in meters
    pub distance_m: f64,
    /// Bearing to the destination in degrees (0-360, true north)
    pub bearing_deg: f64,
    /// True if `distance_m` is strictly below the arrival radius
    pub arrived: bool,
}

/// Maps coordinate pairs to distances and classifies arrival
///
/// Arrival uses a strict comparison: a distance exactly equal to the radius
/// is not an arrival. A NaN distance is never an arrival.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceEvaluator {
    arrival_radius_m: f64,
}

impl DistanceEvaluator {
    /// Create an evaluator with the default 20 m arrival radius
    pub fn new() -> Self {
        Self::with_radius(DEFAULT_ARRIVAL_RADIUS_M)
    }

    /// Create an evaluator with a custom arrival radius in meters
    pub fn with_radius(arrival_radius_m: f64) -> Self {
        Self { arrival_radius_m }
    }

    pub fn arrival_radius_m(&self) -> f64 {
        self.arrival_radius_m
    }

    /// Distance in meters, no validation
    pub fn distance(&self, from: Coordinate, to: Coordinate) -> f64 {
        haversine_distance(from, to)
    }

    /// Distance in meters after validating both endpoints
    pub fn checked_distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<f64, CoordinateError> {
        from.validate()?;
        to.validate()?;
        Ok(haversine_distance(from, to))
    }

    pub fn is_arrived(&self, distance_m: f64) -> bool {
        distance_m < self.arrival_radius_m
    }

    /// Validate both endpoints, then compute distance, bearing and arrival
    pub fn evaluate(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Evaluation, CoordinateError> {
        from.validate()?;
        to.validate()?;
        let (distance_m, bearing_deg) = distance_bearing(from, to);
        Ok(Evaluation {
            distance_m,
            bearing_deg,
            arrived: self.is_arrived(distance_m),
        })
    }
}

impl Default for DistanceEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
