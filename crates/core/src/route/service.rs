//! Routing service abstraction

use core::fmt;

use crate::geo::{BoundingBox, Coordinate};

/// Opaque reference to a drawn route, issued by a [`RouteService`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RouteHandle(pub u64);

impl fmt::Display for RouteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route({})", self.0)
    }
}

/// Errors reported by a routing service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// No path could be found between the endpoints
    NoPath,
    /// The service is not reachable or refused the request
    Unavailable(&'static str),
    /// The handle is not (or no longer) known to the service
    UnknownHandle(RouteHandle),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::NoPath => write!(f, "no route between origin and destination"),
            RouteError::Unavailable(reason) => write!(f, "routing service unavailable: {}", reason),
            RouteError::UnknownHandle(handle) => write!(f, "unknown route handle: {}", handle),
        }
    }
}

impl core::error::Error for RouteError {}

/// Routing engine that turns two coordinates into a drawable path
///
/// Implementations own the drawn path; callers only hold the handle.
pub trait RouteService {
    /// Compute and draw a route, returning its handle
    fn compute_route(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteHandle, RouteError>;

    /// Move the start point of an existing route
    fn update_origin(&mut self, handle: RouteHandle, origin: Coordinate) -> Result<(), RouteError>;

    /// Remove the route and release its resources
    fn teardown(&mut self, handle: RouteHandle) -> Result<(), RouteError>;

    /// Bounding box of the drawn route
    fn bounds(&self, handle: RouteHandle) -> Result<BoundingBox, RouteError>;
}

impl<T: RouteService + ?Sized> RouteService for &mut T {
    fn compute_route(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteHandle, RouteError> {
        (**self).compute_route(origin, destination)
    }

    fn update_origin(&mut self, handle: RouteHandle, origin: Coordinate) -> Result<(), RouteError> {
        (**self).update_origin(handle, origin)
    }

    fn teardown(&mut self, handle: RouteHandle) -> Result<(), RouteError> {
        (**self).teardown(handle)
    }

    fn bounds(&self, handle: RouteHandle) -> Result<BoundingBox, RouteError> {
        (**self).bounds(handle)
    }
}
