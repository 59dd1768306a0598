//! Built-in routing service
//!
//! Campus paths are not modelled; a route is the straight segment between
//! origin and destination. Useful as the default engine and in tests.

use std::collections::HashMap;

use campus_nav_core::{BoundingBox, Coordinate, RouteError, RouteHandle, RouteService};

/// Routes as straight segments
#[derive(Debug, Default)]
pub struct StraightLineRouter {
    next_id: u64,
    routes: HashMap<RouteHandle, (Coordinate, Coordinate)>,
}

impl StraightLineRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoints of a live route
    pub fn route(&self, handle: RouteHandle) -> Option<(Coordinate, Coordinate)> {
        self.routes.get(&handle).copied()
    }

    /// Number of live routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteService for StraightLineRouter {
    fn compute_route(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteHandle, RouteError> {
        if !origin.is_valid() || !destination.is_valid() {
            return Err(RouteError::NoPath);
        }
        self.next_id += 1;
        let handle = RouteHandle(self.next_id);
        self.routes.insert(handle, (origin, destination));
        Ok(handle)
    }

    fn update_origin(&mut self, handle: RouteHandle, origin: Coordinate) -> Result<(), RouteError> {
        if !origin.is_valid() {
            return Err(RouteError::NoPath);
        }
        let route = self
            .routes
            .get_mut(&handle)
            .ok_or(RouteError::UnknownHandle(handle))?;
        route.0 = origin;
        Ok(())
    }

    fn teardown(&mut self, handle: RouteHandle) -> Result<(), RouteError> {
        self.routes
            .remove(&handle)
            .map(|_| ())
            .ok_or(RouteError::UnknownHandle(handle))
    }

    fn bounds(&self, handle: RouteHandle) -> Result<BoundingBox, RouteError> {
        self.routes
            .get(&handle)
            .map(|(origin, destination)| BoundingBox::from_corners(*origin, *destination))
            .ok_or(RouteError::UnknownHandle(handle))
    }
}
