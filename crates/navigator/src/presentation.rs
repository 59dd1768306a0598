//! Presentation boundary
//!
//! The controller hands a [`NavigationFrame`] to its [`Presenter`] after
//! every state change. Rendering itself (map, markers, polylines) lives
//! behind the trait.

use campus_nav_core::geo::DistanceLabel;
use campus_nav_core::{BoundingBox, Coordinate, NavigationMode, RouteHandle, SourceKind};
use log::{info, warn};

use crate::directory::Destination;

/// Snapshot of everything a map view needs
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFrame {
    pub position: Coordinate,
    pub destination: Option<Coordinate>,
    pub route: Option<RouteHandle>,
    pub remaining_m: Option<f64>,
    pub bearing_deg: Option<f64>,
    pub mode: NavigationMode,
    /// Kind of the running source, if any
    pub source: Option<SourceKind>,
    /// Whether the view should keep the position centered
    pub following: bool,
    pub warning: Option<String>,
}

impl NavigationFrame {
    /// Remaining distance formatted for display ("85 m", "1.20 km")
    pub fn remaining_label(&self) -> Option<String> {
        self.remaining_m.map(|d| DistanceLabel(d).to_string())
    }
}

/// Renders navigation state
pub trait Presenter: Send {
    fn render(&mut self, frame: &NavigationFrame);

    /// Called once per computed route
    fn fit_bounds(&mut self, _bounds: &BoundingBox) {}

    /// Called once when the destination is reached
    fn arrived(&mut self, _destination: &Destination) {}
}

/// Presenter that writes frames to the log
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_warning: Option<String>,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for LogPresenter {
    fn render(&mut self, frame: &NavigationFrame) {
        if frame.warning != self.last_warning {
            if let Some(warning) = &frame.warning {
                warn!("{}", warning);
            }
            self.last_warning = frame.warning.clone();
        }
        match (frame.mode, frame.remaining_label()) {
            (NavigationMode::Navigating, Some(remaining)) => info!(
                "[{}] {} remaining, heading {:.0} deg, at {}",
                frame.source.map_or("none", |s| s.name()),
                remaining,
                frame.bearing_deg.unwrap_or_default(),
                frame.position
            ),
            (mode, _) => info!("[{}] at {}", mode, frame.position),
        }
    }

    fn fit_bounds(&mut self, bounds: &BoundingBox) {
        info!(
            "Route bounds: {} .. {} (center {})",
            bounds.south_west,
            bounds.north_east,
            bounds.center()
        );
    }

    fn arrived(&mut self, destination: &Destination) {
        info!(
            "You have reached your destination: {}, {}",
            destination.label(),
            destination.office()
        );
    }
}
