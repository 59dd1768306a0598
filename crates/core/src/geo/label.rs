//! Remaining-distance formatting

use core::fmt;

/// Display wrapper for a distance in meters
///
/// Distances above one kilometre render as `"1.23 km"`, everything else as
/// whole meters (`"523 m"`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceLabel(pub f64);

impl fmt::Display for DistanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 > 1000.0 {
            write!(f, "{:.2} km", self.0 / 1000.0)
        } else {
            write!(f, "{:.0} m", libm::round(self.0))
        }
    }
}
