//! Great-circle calculations
//!
//! Pure functions over [`Coordinate`] pairs. Inputs are not validated here;
//! a non-finite input yields a NaN result. Use
//! [`DistanceEvaluator::checked_distance`](crate::arrival::DistanceEvaluator::checked_distance)
//! where the input crosses a trust boundary.

use libm::{atan2, cos, sin, sqrt};

use super::Coordinate;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Distance in meters between two positions using the haversine formula
pub fn haversine_distance(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude * DEG_TO_RAD;
    let lat2_rad = to.latitude * DEG_TO_RAD;
    let delta_lat = (to.latitude - from.latitude) * DEG_TO_RAD;
    let delta_lon = (to.longitude - from.longitude) * DEG_TO_RAD;

    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlon = sin(delta_lon / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1_rad) * cos(lat2_rad) * sin_dlon * sin_dlon;
    // Rounding can push `a` a hair past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));

    EARTH_RADIUS_M * c
}

/// Forward azimuth from `from` to `to` in degrees (0-360, 0 = north)
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude * DEG_TO_RAD;
    let lat2_rad = to.latitude * DEG_TO_RAD;
    let delta_lon = (to.longitude - from.longitude) * DEG_TO_RAD;

    let y = sin(delta_lon) * cos(lat2_rad);
    let x = cos(lat1_rad) * sin(lat2_rad) - sin(lat1_rad) * cos(lat2_rad) * cos(delta_lon);
    let bearing = atan2(y, x) * RAD_TO_DEG;
    (bearing + 360.0) % 360.0
}

/// Tuple of (distance in meters, bearing in degrees 0-360)
pub fn distance_bearing(from: Coordinate, to: Coordinate) -> (f64, f64) {
    (haversine_distance(from, to), bearing(from, to))
}
