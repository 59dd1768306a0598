//! Navigation mode state machine
//!
//! ```text
//! Idle --start--> Loading --route data ready--> Navigating --arrival--> Arrived
//!  ^                 |                              |                     |
//!  +------stop-------+--------------stop------------+---------stop--------+
//! Arrived --start--> Loading (fresh session)
//! ```

use core::fmt;

/// Navigation mode of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NavigationMode {
    /// No navigation in progress
    #[default]
    Idle,
    /// Route data is being prepared (bounded placeholder state)
    Loading,
    /// Following a live route toward the destination
    Navigating,
    /// Within the arrival radius; destination kept for display
    Arrived,
}

impl NavigationMode {
    /// Mode name for logging and presentation
    pub fn name(&self) -> &'static str {
        match self {
            NavigationMode::Idle => "idle",
            NavigationMode::Loading => "loading",
            NavigationMode::Navigating => "navigating",
            NavigationMode::Arrived => "arrived",
        }
    }

    /// True while a session is being prepared or followed
    pub fn is_active(&self) -> bool {
        matches!(self, NavigationMode::Loading | NavigationMode::Navigating)
    }

    /// Check whether `next` is reachable from this mode in one step
    ///
    /// Any mode may return to `Idle` (stop). Staying in the same mode is not a
    /// transition.
    pub fn can_transition_to(&self, next: NavigationMode) -> bool {
        use NavigationMode::*;
        matches!(
            (*self, next),
            (Idle, Loading)
                | (Loading, Navigating)
                | (Navigating, Arrived)
                | (Arrived, Loading)
                | (Loading, Idle)
                | (Navigating, Idle)
                | (Arrived, Idle)
        )
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attempted mode change that the state machine does not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: NavigationMode,
    pub to: NavigationMode,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid navigation mode transition: {} -> {}", self.from, self.to)
    }
}

impl core::error::Error for TransitionError {}
