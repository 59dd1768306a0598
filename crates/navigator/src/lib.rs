//! campus_nav - live navigation to campus offices
//!
//! The [`NavigationController`] owns the navigation session and serializes
//! every change to it. Position updates (device provider or walking
//! simulation), simulation ticks and the loading delay arrive as
//! [`SourceEvent`]s on one channel and are applied one at a time.

pub mod config;
pub mod controller;
pub mod directory;
pub mod error;
pub mod location;
pub mod presentation;
pub mod route;
pub mod source;

pub use campus_nav_core::{
    BoundingBox, Coordinate, NavigationMode, RouteError, RouteHandle, RouteService, SourceKind,
};
pub use config::{NavigatorConfig, SimulationSettings, SourcePreference};
pub use controller::NavigationController;
pub use directory::{Destination, Directory, StaticDirectory};
pub use error::NavigationError;
pub use location::{
    LocationError, LocationOptions, LocationProvider, MockLocationProvider, PositionSink,
    SourceEvent, SourceEventKind, SubscriptionId,
};
pub use presentation::{LogPresenter, NavigationFrame, Presenter};
pub use route::StraightLineRouter;
pub use source::{ActiveSource, PositionSource, RealPositionSource, SimulatedPositionSource};
