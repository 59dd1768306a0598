//! Navigator configuration
//!
//! Every field has a default, so a JSON file only needs the keys it
//! overrides:
//!
//! ```json
//! { "initial_source": "simulated", "simulation": { "step_deg": 0.0001 } }
//! ```

use std::path::Path;
use std::time::Duration;

use campus_nav_core::simulation::{
    DEFAULT_STEP_DEG, DEFAULT_STOP_RADIUS_M, DEFAULT_TICK_INTERVAL_MS,
};
use campus_nav_core::{Coordinate, DistanceEvaluator, SimulationConfig, SourceKind};
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::location::LocationOptions;

/// Fallback position used until a device fix is obtained
pub const DEFAULT_FALLBACK: Coordinate = Coordinate::new(37.9310, 41.9370);

/// Delay between starting navigation and route display
pub const DEFAULT_LOADING_MS: u64 = 1000;

/// Position source used when a navigation session becomes active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePreference {
    #[default]
    Real,
    Simulated,
}

impl From<SourcePreference> for SourceKind {
    fn from(preference: SourcePreference) -> Self {
        match preference {
            SourcePreference::Real => SourceKind::Real,
            SourcePreference::Simulated => SourceKind::Simulated,
        }
    }
}

/// Walking simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Step length per tick, in degrees
    pub step_deg: f64,
    pub tick_interval_ms: u64,
    /// The simulation stops once closer than this
    pub stop_radius_m: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            step_deg: DEFAULT_STEP_DEG,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            stop_radius_m: DEFAULT_STOP_RADIUS_M,
        }
    }
}

impl From<SimulationSettings> for SimulationConfig {
    fn from(settings: SimulationSettings) -> Self {
        SimulationConfig {
            step_deg: settings.step_deg,
            tick_interval_ms: settings.tick_interval_ms,
            stop_radius_m: settings.stop_radius_m,
        }
    }
}

/// Navigator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub fallback_latitude: f64,
    pub fallback_longitude: f64,
    /// Remaining distance below which the destination counts as reached
    pub arrival_radius_m: f64,
    /// Loading delay in milliseconds; 0 enters navigation synchronously
    pub loading_ms: u64,
    pub initial_source: SourcePreference,
    pub simulation: SimulationSettings,
    /// Options for single fix requests
    pub location: LocationOptions,
    /// Options for the continuous subscription while navigating
    #[serde(default = "LocationOptions::watch")]
    pub watch: LocationOptions,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            fallback_latitude: DEFAULT_FALLBACK.latitude,
            fallback_longitude: DEFAULT_FALLBACK.longitude,
            arrival_radius_m: campus_nav_core::arrival::DEFAULT_ARRIVAL_RADIUS_M,
            loading_ms: DEFAULT_LOADING_MS,
            initial_source: SourcePreference::Real,
            simulation: SimulationSettings::default(),
            location: LocationOptions::default(),
            watch: LocationOptions::watch(),
        }
    }
}

impl NavigatorConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, NavigationError> {
        let config: NavigatorConfig = serde_json::from_str(json)
            .map_err(|e| NavigationError::Config(format!("JSON parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, NavigationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), NavigationError> {
        self.fallback_position()
            .validate()
            .map_err(|e| NavigationError::Config(format!("fallback position: {}", e)))?;
        if !self.arrival_radius_m.is_finite() || self.arrival_radius_m < 0.0 {
            return Err(NavigationError::Config(format!(
                "arrival radius must be finite and >= 0, got {}",
                self.arrival_radius_m
            )));
        }
        self.simulation_config()
            .validate()
            .map_err(|e| NavigationError::Config(e.to_string()))?;
        if self.location.timeout_ms == 0 || self.watch.timeout_ms == 0 {
            return Err(NavigationError::Config(
                "location timeout must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fallback_position(&self) -> Coordinate {
        Coordinate::new(self.fallback_latitude, self.fallback_longitude)
    }

    pub fn simulation_config(&self) -> SimulationConfig {
        self.simulation.into()
    }

    pub fn evaluator(&self) -> DistanceEvaluator {
        DistanceEvaluator::with_radius(self.arrival_radius_m)
    }

    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_ms)
    }
}
