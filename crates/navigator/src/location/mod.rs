//! Device location access
//!
//! A [`LocationProvider`] delivers fixes either once ([`current_position`])
//! or continuously into a [`PositionSink`] until unsubscribed. Providers are
//! shared (`Arc<dyn LocationProvider>`) between the controller and the real
//! position source.
//!
//! [`current_position`]: LocationProvider::current_position

mod mock;
mod sink;

use std::time::Duration;

use async_trait::async_trait;
use campus_nav_core::Coordinate;
use serde::{Deserialize, Serialize};

pub use mock::MockLocationProvider;
pub use sink::{PositionSink, SourceEvent, SourceEventKind};

/// Identifies one continuous subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Location provider errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Timed out waiting for a position fix")]
    Timeout,

    #[error("Location services are not supported")]
    Unsupported,
}

/// Timeout of the continuous subscription's fixes
pub const DEFAULT_WATCH_TIMEOUT_MS: u64 = 2000;

/// Options passed to the provider with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationOptions {
    pub high_accuracy: bool,
    /// Upper bound on waiting for a single fix
    pub timeout_ms: u64,
    /// Maximum age of a cached fix; 0 requires a fresh one
    pub maximum_age_ms: u64,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 5000,
            maximum_age_ms: 0,
        }
    }
}

impl LocationOptions {
    /// Defaults for a continuous subscription: fresh fixes, shorter timeout
    pub fn watch() -> Self {
        Self {
            timeout_ms: DEFAULT_WATCH_TIMEOUT_MS,
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Source of device position fixes
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Start delivering fixes (and failures) into `sink`
    ///
    /// Delivery stops when the subscription is removed or the sink is
    /// closed, whichever happens first.
    fn subscribe(
        &self,
        sink: PositionSink,
        options: &LocationOptions,
    ) -> Result<SubscriptionId, LocationError>;

    /// Remove a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Obtain a single fix
    async fn current_position(
        &self,
        options: &LocationOptions,
    ) -> Result<Coordinate, LocationError>;
}
