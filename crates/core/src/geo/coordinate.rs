//! Coordinate type definitions

use core::fmt;

/// Geographic position in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to +180)
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without validation
    ///
    /// Values coming from outside the process (location providers, files)
    /// should go through [`Coordinate::try_new`] or [`Coordinate::validate`].
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        let coordinate = Self::new(latitude, longitude);
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check that both components are finite and within their ranges
    pub fn validate(&self) -> Result<(), CoordinateError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Reasons a coordinate is rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    /// Latitude or longitude is NaN or infinite
    NonFinite,
    /// Latitude outside -90..=90
    LatitudeOutOfRange(f64),
    /// Longitude outside -180..=180
    LongitudeOutOfRange(f64),
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::NonFinite => write!(f, "coordinate is not finite"),
            CoordinateError::LatitudeOutOfRange(lat) => {
                write!(f, "latitude {} outside -90..=90", lat)
            }
            CoordinateError::LongitudeOutOfRange(lon) => {
                write!(f, "longitude {} outside -180..=180", lon)
            }
        }
    }
}

impl core::error::Error for CoordinateError {}

/// Axis-aligned bounding box in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum latitude / minimum longitude corner
    pub south_west: Coordinate,
    /// Maximum latitude / maximum longitude corner
    pub north_east: Coordinate,
}

impl BoundingBox {
    /// Smallest box containing both points, in any order
    pub fn from_corners(a: Coordinate, b: Coordinate) -> Self {
        Self {
            south_west: Coordinate::new(a.latitude.min(b.latitude), a.longitude.min(b.longitude)),
            north_east: Coordinate::new(a.latitude.max(b.latitude), a.longitude.max(b.longitude)),
        }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }
}
