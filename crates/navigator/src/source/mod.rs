//! Position sources
//!
//! At most one source is active per navigation session. A source emits
//! into a [`PositionSink`] from `start` until `stop`; stopping closes the
//! sink before returning, so nothing is delivered afterwards.

mod real;
mod simulated;

use campus_nav_core::SourceKind;

pub use real::RealPositionSource;
pub use simulated::SimulatedPositionSource;

use crate::error::NavigationError;
use crate::location::PositionSink;

/// Fail unless called from within a Tokio runtime
pub(crate) fn ensure_runtime() -> Result<(), NavigationError> {
    tokio::runtime::Handle::try_current()
        .map(|_| ())
        .map_err(|_| NavigationError::RuntimeUnavailable)
}

/// Producer of position (or tick) events
pub trait PositionSource: Send {
    fn kind(&self) -> SourceKind;

    /// Begin emitting into `sink`. Starting a running source is a no-op.
    fn start(&mut self, sink: PositionSink) -> Result<(), NavigationError>;

    /// Stop emitting. Idempotent.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// The source currently owned by the controller
pub enum ActiveSource {
    Real(RealPositionSource),
    Simulated(SimulatedPositionSource),
}

impl ActiveSource {
    pub fn kind(&self) -> SourceKind {
        self.as_source().kind()
    }

    pub fn as_source(&self) -> &dyn PositionSource {
        match self {
            ActiveSource::Real(source) => source,
            ActiveSource::Simulated(source) => source,
        }
    }

    pub fn as_source_mut(&mut self) -> &mut dyn PositionSource {
        match self {
            ActiveSource::Real(source) => source,
            ActiveSource::Simulated(source) => source,
        }
    }
}
