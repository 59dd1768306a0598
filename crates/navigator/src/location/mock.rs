use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use campus_nav_core::Coordinate;

use super::{LocationError, LocationOptions, LocationProvider, PositionSink, SubscriptionId};

/// In-process location provider
///
/// Fixes are pushed explicitly with [`push`](Self::push). Used by the
/// command-line runner (which has no device) and by tests.
pub struct MockLocationProvider {
    state: Mutex<MockState>,
}

struct MockState {
    next_id: u64,
    subscribers: HashMap<SubscriptionId, PositionSink>,
    current: Result<Coordinate, LocationError>,
    subscribe_error: Option<LocationError>,
    fix_delay: Duration,
    last_options: Option<LocationOptions>,
}

impl MockLocationProvider {
    /// Provider whose single-fix requests answer `current`
    pub fn new(current: Coordinate) -> Self {
        Self::with_state(Ok(current), None)
    }

    /// Provider that refuses both single fixes and subscriptions
    pub fn unavailable(error: LocationError) -> Self {
        Self::with_state(Err(error.clone()), Some(error))
    }

    fn with_state(
        current: Result<Coordinate, LocationError>,
        subscribe_error: Option<LocationError>,
    ) -> Self {
        Self {
            state: Mutex::new(MockState {
                next_id: 1,
                subscribers: HashMap::new(),
                current,
                subscribe_error,
                fix_delay: Duration::ZERO,
                last_options: None,
            }),
        }
    }

    /// Delay every single-fix answer by `delay`
    pub fn with_fix_delay(self, delay: Duration) -> Self {
        self.state().fix_delay = delay;
        self
    }

    pub fn set_current(&self, current: Result<Coordinate, LocationError>) {
        self.state().current = current;
    }

    /// Deliver `position` to every subscriber; returns how many accepted it
    pub fn push(&self, position: Coordinate) -> usize {
        self.state()
            .subscribers
            .values()
            .filter(|sink| sink.update(position))
            .count()
    }

    /// Report a lost fix to every subscriber; returns how many accepted it
    pub fn fail(&self, reason: &str) -> usize {
        let error = LocationError::PositionUnavailable(reason.to_string()).to_string();
        self.state()
            .subscribers
            .values()
            .filter(|sink| sink.error(error.as_str()))
            .count()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state().subscribers.len()
    }

    /// Options of the most recent request
    pub fn last_options(&self) -> Option<LocationOptions> {
        self.state().last_options.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LocationProvider for MockLocationProvider {
    fn subscribe(
        &self,
        sink: PositionSink,
        options: &LocationOptions,
    ) -> Result<SubscriptionId, LocationError> {
        let mut state = self.state();
        state.last_options = Some(options.clone());
        if let Some(error) = &state.subscribe_error {
            return Err(error.clone());
        }
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscribers.insert(id, sink);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.state().subscribers.remove(&id);
    }

    async fn current_position(
        &self,
        options: &LocationOptions,
    ) -> Result<Coordinate, LocationError> {
        let delay = {
            let mut state = self.state();
            state.last_options = Some(options.clone());
            state.fix_delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.state().current.clone()
    }
}
