//! Geographic types and calculations
//!
//! - `Coordinate`: latitude/longitude pair in degrees
//! - `BoundingBox`: axis-aligned box used to fit a viewport around a route
//! - `haversine_distance` / `bearing`: great-circle distance and forward azimuth
//! - `DistanceLabel`: human-readable remaining distance

mod coordinate;
mod distance;
mod label;

pub use coordinate::{BoundingBox, Coordinate, CoordinateError};
pub use distance::{bearing, distance_bearing, haversine_distance, EARTH_RADIUS_M};
pub use label::DistanceLabel;
