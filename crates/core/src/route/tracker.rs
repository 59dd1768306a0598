//! Route tracker state machine
//!
//! ```text
//! Inactive --activate--> NeedsFullRoute --route computed--> Tracking
//!                             ^                               |  ^
//!                             |   unknown handle on update    |  | origin update
//!                             +-------------------------------+--+
//! any --deactivate--> Inactive (route torn down)
//! ```

use crate::geo::{BoundingBox, Coordinate};

use super::{RouteError, RouteHandle, RouteService};

/// Tracker state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RouteState {
    /// No route; origin updates are ignored
    #[default]
    Inactive,
    /// Endpoints known, a full computation is pending (or failed and will be retried)
    NeedsFullRoute,
    /// A route is drawn and follows the origin
    Tracking(RouteHandle),
}

/// What the tracker did in response to a call
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RouteAction {
    /// A route was computed from scratch. `bounds` is the viewport to fit,
    /// reported once per computation.
    Computed {
        handle: RouteHandle,
        bounds: Option<BoundingBox>,
    },
    /// Only the start point of the existing route moved
    OriginUpdated(RouteHandle),
    /// Tracker inactive, nothing done
    Unchanged,
}

/// Owns the single route handle for a navigation session
pub struct RouteTracker<S> {
    service: S,
    state: RouteState,
    origin: Option<Coordinate>,
    destination: Option<Coordinate>,
}

impl<S: RouteService> RouteTracker<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            state: RouteState::Inactive,
            origin: None,
            destination: None,
        }
    }

    pub fn state(&self) -> RouteState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != RouteState::Inactive
    }

    /// Handle of the drawn route, if any
    pub fn handle(&self) -> Option<RouteHandle> {
        match self.state {
            RouteState::Tracking(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    pub fn destination(&self) -> Option<Coordinate> {
        self.destination
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    #[cfg(test)]
    fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// Activate the tracker and request a full route
    ///
    /// Re-activating with the same destination while tracking only moves the
    /// origin. A different destination replaces the route; the old route's
    /// teardown result is discarded, so callers that care call
    /// [`deactivate`](Self::deactivate) first.
    ///
    /// A failed computation leaves the tracker in `NeedsFullRoute`; the next
    /// origin update retries it.
    pub fn activate(
        &mut self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteAction, RouteError> {
        if matches!(self.state, RouteState::Tracking(_)) && self.destination == Some(destination) {
            return self.update_origin(origin);
        }

        if self.is_active() {
            let _ = self.deactivate();
        }

        self.origin = Some(origin);
        self.destination = Some(destination);
        self.state = RouteState::NeedsFullRoute;
        self.compute()
    }

    /// Move the start point
    pub fn update_origin(&mut self, origin: Coordinate) -> Result<RouteAction, RouteError> {
        match self.state {
            RouteState::Inactive => Ok(RouteAction::Unchanged),
            RouteState::NeedsFullRoute => {
                self.origin = Some(origin);
                self.compute()
            }
            RouteState::Tracking(handle) => {
                self.origin = Some(origin);
                match self.service.update_origin(handle, origin) {
                    Ok(()) => Ok(RouteAction::OriginUpdated(handle)),
                    Err(RouteError::UnknownHandle(lost)) => {
                        self.state = RouteState::NeedsFullRoute;
                        Err(RouteError::UnknownHandle(lost))
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Release the route
    ///
    /// The tracker is inactive afterwards even if the service rejects the
    /// teardown; the error is returned for the caller to report.
    pub fn deactivate(&mut self) -> Result<(), RouteError> {
        let previous = core::mem::take(&mut self.state);
        self.origin = None;
        self.destination = None;
        match previous {
            RouteState::Tracking(handle) => self.service.teardown(handle),
            RouteState::NeedsFullRoute | RouteState::Inactive => Ok(()),
        }
    }

    fn compute(&mut self) -> Result<RouteAction, RouteError> {
        let (Some(origin), Some(destination)) = (self.origin, self.destination) else {
            return Ok(RouteAction::Unchanged);
        };
        let handle = self.service.compute_route(origin, destination)?;
        self.state = RouteState::Tracking(handle);
        let bounds = self.service.bounds(handle).ok();
        Ok(RouteAction::Computed { handle, bounds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Coordinate = Coordinate::new(37.9310, 41.9370);
    const OFFICE: Coordinate = Coordinate::new(37.9315, 41.9378);
    const OTHER_OFFICE: Coordinate = Coordinate::new(37.9320, 41.9380);

    /// Counts calls and can be told to fail
    #[derive(Default)]
    struct MockRouter {
        next_id: u64,
        live: Option<RouteHandle>,
        origin: Option<Coordinate>,
        destination: Option<Coordinate>,
        computes: u32,
        origin_updates: u32,
        teardowns: u32,
        fail_compute: bool,
        fail_teardown: bool,
        forget_routes: bool,
    }

    impl RouteService for MockRouter {
        fn compute_route(
            &mut self,
            origin: Coordinate,
            destination: Coordinate,
        ) -> Result<RouteHandle, RouteError> {
            self.computes += 1;
            if self.fail_compute {
                return Err(RouteError::Unavailable("offline"));
            }
            self.next_id += 1;
            let handle = RouteHandle(self.next_id);
            self.live = Some(handle);
            self.origin = Some(origin);
            self.destination = Some(destination);
            Ok(handle)
        }

        fn update_origin(
            &mut self,
            handle: RouteHandle,
            origin: Coordinate,
        ) -> Result<(), RouteError> {
            self.origin_updates += 1;
            if self.forget_routes || self.live != Some(handle) {
                return Err(RouteError::UnknownHandle(handle));
            }
            self.origin = Some(origin);
            Ok(())
        }

        fn teardown(&mut self, handle: RouteHandle) -> Result<(), RouteError> {
            self.teardowns += 1;
            self.live = None;
            if self.fail_teardown {
                return Err(RouteError::Unavailable("removal rejected"));
            }
            let _ = handle;
            Ok(())
        }

        fn bounds(&self, handle: RouteHandle) -> Result<BoundingBox, RouteError> {
            match (self.live, self.origin, self.destination) {
                (Some(live), Some(o), Some(d)) if live == handle => {
                    Ok(BoundingBox::from_corners(o, d))
                }
                _ => Err(RouteError::UnknownHandle(handle)),
            }
        }
    }

    #[test]
    fn test_new_tracker_is_inactive() {
        let tracker = RouteTracker::new(MockRouter::default());
        assert_eq!(tracker.state(), RouteState::Inactive);
        assert!(!tracker.is_active());
        assert!(tracker.handle().is_none());
    }

    #[test]
    fn test_activate_computes_route_and_reports_bounds() {
        let mut tracker = RouteTracker::new(MockRouter::default());
        let action = tracker.activate(START, OFFICE).unwrap();

        let RouteAction::Computed { handle, bounds } = action else {
            panic!("expected a full computation, got {:?}", action);
        };
        assert_eq!(tracker.state(), RouteState::Tracking(handle));
        assert_eq!(bounds, Some(BoundingBox::from_corners(START, OFFICE)));
        assert_eq!(tracker.service().computes, 1);
    }

    #[test]
    fn test_origin_updates_do_not_recompute() {
        let mut tracker = RouteTracker::new(MockRouter::default());
        tracker.activate(START, OFFICE).unwrap();

        for i in 1..=5 {
            let origin = Coordinate::new(START.latitude + i as f64 * 0.00001, START.longitude);
            let action = tracker.update_origin(origin).unwrap();
            assert!(matches!(action, RouteAction::OriginUpdated(_)));
            assert_eq!(tracker.origin(), Some(origin));
        }

        assert_eq!(tracker.service().computes, 1);
        assert_eq!(tracker.service().origin_updates, 5);
    }

    #[test]
    fn test_update_origin_when_inactive_is_unchanged() {
        let mut tracker = RouteTracker::new(MockRouter::default());
        assert_eq!(tracker.update_origin(START).unwrap(), RouteAction::Unchanged);
        assert_eq!(tracker.service().origin_updates, 0);
    }

    #[test]
    fn test_reactivate_same_destination_moves_origin_only() {
        let mut tracker = RouteTracker::new(MockRouter::default());
        tracker.activate(START, OFFICE).unwrap();
        let action = tracker.activate(START, OFFICE).unwrap();
        assert!(matches!(action, RouteAction::OriginUpdated(_)));
        assert_eq!(tracker.service().computes, 1);
    }

    #[test]
    fn test_destination_change_replaces_route() {
        let mut tracker = RouteTracker::new(MockRouter::default());
        tracker.activate(START, OFFICE).unwrap();
        let first = tracker.handle().unwrap();

        let action = tracker.activate(START, OTHER_OFFICE).unwrap();
        assert!(matches!(action, RouteAction::Computed { .. }));
        assert_ne!(tracker.handle(), Some(first));
        assert_eq!(tracker.service().teardowns, 1);
        assert_eq!(tracker.destination(), Some(OTHER_OFFICE));
    }

    #[test]
    fn test_deactivate_tears_down_route() {
        let mut tracker = RouteTracker::new(MockRouter::default());
        tracker.activate(START, OFFICE).unwrap();
        tracker.deactivate().unwrap();

        assert_eq!(tracker.state(), RouteState::Inactive);
        assert!(tracker.destination().is_none());
        assert_eq!(tracker.service().teardowns, 1);
        assert!(tracker.service().live.is_none());
    }

    #[test]
    fn test_deactivate_when_inactive_is_noop() {
        let mut tracker = RouteTracker::new(MockRouter::default());
        assert!(tracker.deactivate().is_ok());
        assert_eq!(tracker.service().teardowns, 0);
    }

    #[test]
    fn test_failed_teardown_still_deactivates() {
        let mut tracker = RouteTracker::new(MockRouter {
            fail_teardown: true,
            ..Default::default()
        });
        tracker.activate(START, OFFICE).unwrap();
        assert!(tracker.deactivate().is_err());
        assert_eq!(tracker.state(), RouteState::Inactive);

        // A fresh session can start right away
        tracker.service_mut().fail_teardown = false;
        assert!(tracker.activate(START, OFFICE).is_ok());
    }

    #[test]
    fn test_failed_compute_retried_on_next_origin_update() {
        let mut tracker = RouteTracker::new(MockRouter {
            fail_compute: true,
            ..Default::default()
        });
        assert!(tracker.activate(START, OFFICE).is_err());
        assert_eq!(tracker.state(), RouteState::NeedsFullRoute);

        tracker.service_mut().fail_compute = false;
        let action = tracker.update_origin(START).unwrap();
        assert!(matches!(action, RouteAction::Computed { .. }));
        assert_eq!(tracker.service().computes, 2);
    }

    #[test]
    fn test_unknown_handle_falls_back_to_full_route() {
        let mut tracker = RouteTracker::new(MockRouter::default());
        tracker.activate(START, OFFICE).unwrap();
        tracker.service_mut().forget_routes = true;

        assert!(matches!(
            tracker.update_origin(START),
            Err(RouteError::UnknownHandle(_))
        ));
        assert_eq!(tracker.state(), RouteState::NeedsFullRoute);

        tracker.service_mut().forget_routes = false;
        assert!(matches!(
            tracker.update_origin(START).unwrap(),
            RouteAction::Computed { .. }
        ));
    }

    #[test]
    fn test_tracker_over_borrowed_service() {
        let mut router = MockRouter::default();
        {
            let mut tracker = RouteTracker::new(&mut router);
            tracker.activate(START, OFFICE).unwrap();
            tracker.deactivate().unwrap();
        }
        assert_eq!(router.computes, 1);
        assert_eq!(router.teardowns, 1);
    }
}
