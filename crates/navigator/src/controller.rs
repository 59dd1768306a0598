//! Navigation controller
//!
//! Owns the session and is its only writer. User commands are methods;
//! everything asynchronous (device fixes, simulation ticks, the loading
//! delay) is queued as a [`SourceEvent`] and applied by
//! [`process_next`](NavigationController::process_next).
//!
//! # Teardown
//!
//! Every producer is stamped with the session generation current when it
//! was started. Stopping navigation, arriving, switching sources and
//! aborting all bump the generation and close the producer's sink before
//! returning, so events already in the queue are dropped unapplied.
//!
//! # Arrival
//!
//! With the device source, entering the arrival radius ends the session.
//! The walking simulation announces arrival at the same radius but keeps
//! stepping until its own tighter stop radius, and only then ends the
//! session. The presenter hears about each arrival once.

use std::sync::Arc;

use campus_nav_core::geo::DistanceLabel;
use campus_nav_core::{
    Coordinate, CoordinateError, DistanceEvaluator, NavigationMode, NavigationSession,
    RouteAction, RouteError, RouteHandle, RouteService, RouteTracker, SourceKind, StepOutcome,
    StepperError,
};
use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::NavigatorConfig;
use crate::directory::{Destination, Directory};
use crate::error::NavigationError;
use crate::location::{LocationError, LocationProvider, PositionSink, SourceEvent, SourceEventKind};
use crate::presentation::{NavigationFrame, Presenter};
use crate::source::{ensure_runtime, ActiveSource, RealPositionSource, SimulatedPositionSource};

/// Drives one navigation session at a time
pub struct NavigationController<R: RouteService> {
    config: NavigatorConfig,
    directory: Arc<dyn Directory>,
    provider: Arc<dyn LocationProvider>,
    presenter: Box<dyn Presenter>,
    routes: RouteTracker<R>,
    evaluator: DistanceEvaluator,
    session: NavigationSession,
    selected: Option<Destination>,
    /// Kind used for the next source activation
    source_kind: SourceKind,
    source: Option<ActiveSource>,
    loading: Option<JoinHandle<()>>,
    has_fix: bool,
    arrival_announced: bool,
    location_warning: Option<String>,
    last_error: Option<NavigationError>,
    events_tx: mpsc::UnboundedSender<SourceEvent>,
    events_rx: mpsc::UnboundedReceiver<SourceEvent>,
}

impl<R: RouteService> NavigationController<R> {
    pub fn new(
        config: NavigatorConfig,
        directory: Arc<dyn Directory>,
        provider: Arc<dyn LocationProvider>,
        routing: R,
        presenter: Box<dyn Presenter>,
    ) -> Result<Self, NavigationError> {
        config.validate()?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            evaluator: config.evaluator(),
            session: NavigationSession::new(config.fallback_position()),
            source_kind: config.initial_source.into(),
            config,
            directory,
            provider,
            presenter,
            routes: RouteTracker::new(routing),
            selected: None,
            source: None,
            loading: None,
            has_fix: false,
            arrival_announced: false,
            location_warning: None,
            last_error: None,
            events_tx,
            events_rx,
        })
    }

    pub fn mode(&self) -> NavigationMode {
        self.session.mode()
    }

    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    pub fn selected(&self) -> Option<&Destination> {
        self.selected.as_ref()
    }

    /// Kind used when a source is next activated
    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    /// Kind of the source currently owned, if any
    pub fn active_source(&self) -> Option<SourceKind> {
        self.source.as_ref().map(ActiveSource::kind)
    }

    pub fn route(&self) -> Option<RouteHandle> {
        self.routes.handle()
    }

    pub fn routes(&self) -> &RouteTracker<R> {
        &self.routes
    }

    /// Most recent non-fatal location problem
    pub fn location_warning(&self) -> Option<&str> {
        self.location_warning.as_deref()
    }

    /// Error that last aborted a navigation
    pub fn last_error(&self) -> Option<&NavigationError> {
        self.last_error.as_ref()
    }

    pub fn frame(&self) -> NavigationFrame {
        NavigationFrame {
            position: self.session.position(),
            destination: self.session.destination(),
            route: self.routes.handle(),
            remaining_m: self.session.remaining_m(),
            bearing_deg: self.session.bearing_deg(),
            mode: self.session.mode(),
            source: self.active_source(),
            following: self.session.following(),
            warning: self.location_warning.clone(),
        }
    }

    /// Request a single device fix and adopt it as the current position
    ///
    /// On failure or timeout the last known (initially the fallback)
    /// position is kept and a location warning is recorded.
    pub async fn locate(&mut self) -> Coordinate {
        let options = self.config.location.clone();
        let fix = tokio::time::timeout(options.timeout(), self.provider.current_position(&options))
            .await
            .unwrap_or(Err(LocationError::Timeout));

        let applied = fix.map_err(NavigationError::from).and_then(|position| {
            position.validate()?;
            match (self.session.mode(), self.active_source()) {
                // The walk owns the position while simulating
                (NavigationMode::Navigating, Some(SourceKind::Simulated)) => {}
                (NavigationMode::Navigating, _) => self.on_position_update(position)?,
                _ => self.session.set_position(position)?,
            }
            Ok(position)
        });
        match applied {
            Ok(position) => {
                info!("Location fix {}", position);
                self.has_fix = true;
                self.location_warning = None;
            }
            Err(NavigationError::LocationUnavailable(reason)) => self.warn_location(&reason),
            Err(e) => self.warn_location(&e.to_string()),
        }
        self.render();
        self.session.position()
    }

    /// Choose the destination for the next navigation
    ///
    /// Selecting a different destination while a navigation is loading,
    /// running or finished discards that navigation first. Reselecting the
    /// current destination changes nothing.
    pub fn select_destination(&mut self, id: &str) -> Result<Destination, NavigationError> {
        let destination = self
            .directory
            .lookup(id)
            .ok_or_else(|| NavigationError::NotFound(id.to_string()))?;

        if self.selected.as_ref().is_some_and(|current| current.id == id) {
            return Ok(destination);
        }
        if self.session.mode() != NavigationMode::Idle {
            info!("Destination changed, discarding current navigation");
            self.stop_navigation();
        }
        info!("Selected {} ({})", destination.label(), destination.office());
        self.selected = Some(destination.clone());
        Ok(destination)
    }

    /// Start navigating to the selected destination
    ///
    /// Enters `Loading`; `Navigating` follows after the loading delay (or
    /// immediately when the delay is zero). No-op while already loading or
    /// navigating. From `Arrived` a fresh session begins.
    ///
    /// A nonzero loading delay or the simulated source needs a running
    /// Tokio runtime; without one this fails with
    /// [`NavigationError::RuntimeUnavailable`] and the mode is unchanged.
    pub fn start_navigation(&mut self) -> Result<(), NavigationError> {
        let destination = self
            .selected
            .clone()
            .ok_or(NavigationError::NoDestinationSelected)?;
        if self.session.mode().is_active() {
            debug!("Navigation already {}, ignoring start", self.session.mode());
            return Ok(());
        }
        if let Err(e) = destination.coordinate.validate() {
            return Err(self.abort(e));
        }
        if self.config.loading_ms > 0 || self.source_kind == SourceKind::Simulated {
            ensure_runtime()?;
        }

        let generation = self.session.begin(destination.coordinate)?;
        self.arrival_announced = false;
        self.last_error = None;
        info!("Navigating to {}", destination.label());

        if self.config.loading_ms == 0 {
            let result = self.enter_navigating();
            self.render();
            return result;
        }

        let sink = PositionSink::new(self.events_tx.clone(), generation);
        let delay = self.config.loading_delay();
        self.loading = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sink.loading_complete();
        }));
        self.render();
        Ok(())
    }

    /// Abandon the current navigation and return to `Idle`
    ///
    /// Stops the source, releases the route and clears the destination.
    /// Idempotent.
    pub fn stop_navigation(&mut self) {
        if self.session.mode() == NavigationMode::Idle {
            return;
        }
        self.teardown();
        self.session.reset();
        info!("Navigation stopped");
        self.render();
    }

    /// Swap between the device and the walking simulation mid-navigation
    ///
    /// The old source is stopped before the new one starts; destination
    /// and route are kept. Switching to the simulation outside a Tokio
    /// runtime fails with [`NavigationError::RuntimeUnavailable`] and keeps
    /// the current source.
    pub fn toggle_simulation_mode(&mut self) -> Result<SourceKind, NavigationError> {
        if self.session.mode() != NavigationMode::Navigating {
            return Err(NavigationError::NotNavigating);
        }
        let next = self.source_kind.toggled();
        if next == SourceKind::Simulated {
            ensure_runtime()?;
        }
        self.activate_source(next)?;
        info!("Position source switched to {}", next);
        self.render();
        Ok(next)
    }

    /// Enable or disable keeping the map centered on the position
    pub fn set_following(&mut self, following: bool) {
        if self.session.following() != following {
            self.session.set_following(following);
            self.render();
        }
    }

    /// Wait for the next queued event and apply it
    pub async fn process_next(&mut self) -> Result<(), NavigationError> {
        match self.events_rx.recv().await {
            Some(event) => self.handle_event(event),
            None => Ok(()),
        }
    }

    /// Apply every event already queued; returns how many were taken
    pub fn process_pending(&mut self) -> Result<usize, NavigationError> {
        let mut processed = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            processed += 1;
            self.handle_event(event)?;
        }
        Ok(processed)
    }

    /// Process events until the session is neither loading nor navigating
    ///
    /// With the device source this only returns once fixes bring the
    /// position within the arrival radius.
    pub async fn run_until_settled(&mut self) -> Result<NavigationMode, NavigationError> {
        while self.session.mode().is_active() {
            self.process_next().await?;
        }
        Ok(self.session.mode())
    }

    /// Apply one event; events from a superseded generation are dropped
    pub fn handle_event(&mut self, event: SourceEvent) -> Result<(), NavigationError> {
        if !self.session.is_current(event.generation) {
            debug!(
                "Dropping stale {:?} (generation {}, current {})",
                event.kind,
                event.generation.value(),
                self.session.generation().value()
            );
            return Ok(());
        }

        let mode = self.session.mode();
        let result = match event.kind {
            SourceEventKind::LoadingComplete if mode == NavigationMode::Loading => {
                self.enter_navigating()
            }
            SourceEventKind::Position(position) if mode == NavigationMode::Navigating => {
                self.has_fix = true;
                self.on_position_update(position)
            }
            SourceEventKind::SimulationTick if mode == NavigationMode::Navigating => {
                self.on_simulation_tick()
            }
            SourceEventKind::ProviderError(reason) => {
                self.warn_location(&reason);
                Ok(())
            }
            kind => {
                debug!("Ignoring {:?} while {}", kind, mode);
                Ok(())
            }
        };
        self.render();
        result
    }

    fn enter_navigating(&mut self) -> Result<(), NavigationError> {
        self.loading = None;
        self.session.transition(NavigationMode::Navigating)?;
        let Some(destination) = self.session.destination() else {
            return Err(NavigationError::NoDestinationSelected);
        };

        let origin = self.session.position();
        let action = self.routes.activate(origin, destination);
        self.apply_route(action);
        self.activate_source(self.source_kind)?;

        // Starting inside the arrival radius announces arrival immediately
        self.evaluate_position()
    }

    /// Stop any current source, then start one of `kind` under a fresh
    /// generation
    fn activate_source(&mut self, kind: SourceKind) -> Result<(), NavigationError> {
        self.deactivate_source();
        let generation = self.session.invalidate();
        let sink = PositionSink::new(self.events_tx.clone(), generation);

        let mut source = match kind {
            SourceKind::Real => ActiveSource::Real(RealPositionSource::new(
                Arc::clone(&self.provider),
                self.config.watch.clone(),
            )),
            SourceKind::Simulated => ActiveSource::Simulated(SimulatedPositionSource::new(
                self.config.simulation_config(),
            )?),
        };
        if let Err(e) = source.as_source_mut().start(sink) {
            self.warn_location(&e.to_string());
        }
        self.source = Some(source);
        self.source_kind = kind;
        Ok(())
    }

    fn deactivate_source(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.as_source_mut().stop();
            debug!("Stopped {} position source", source.kind());
        }
    }

    fn on_simulation_tick(&mut self) -> Result<(), NavigationError> {
        let Some(destination) = self.session.destination() else {
            return Ok(());
        };
        let position = self.session.position();
        let Some(ActiveSource::Simulated(simulation)) = self.source.as_mut() else {
            return Ok(());
        };

        match simulation.step(position, destination) {
            Ok(Some(StepOutcome::Moved(next))) => self.on_position_update(next),
            Ok(Some(StepOutcome::Arrived)) => {
                info!("Simulation reached its stop radius");
                self.arrive();
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(StepperError::InvalidCoordinate(e)) => Err(self.abort(e)),
            Err(e) => Err(e.into()),
        }
    }

    fn on_position_update(&mut self, position: Coordinate) -> Result<(), NavigationError> {
        if let Err(e) = self.session.set_position(position) {
            return Err(self.abort(e));
        }
        let action = self.routes.update_origin(position);
        self.apply_route(action);
        self.evaluate_position()
    }

    fn evaluate_position(&mut self) -> Result<(), NavigationError> {
        let Some(destination) = self.session.destination() else {
            return Ok(());
        };
        let evaluation = match self.evaluator.evaluate(self.session.position(), destination) {
            Ok(evaluation) => evaluation,
            Err(e) => return Err(self.abort(e)),
        };
        self.session.record(&evaluation);
        debug!(
            "{} remaining, bearing {:.0} deg",
            DistanceLabel(evaluation.distance_m),
            evaluation.bearing_deg
        );
        if evaluation.arrived {
            match self.active_source() {
                // The walk continues to the stepper's stop radius
                Some(SourceKind::Simulated) => self.announce_arrival(),
                _ => self.arrive(),
            }
        }
        Ok(())
    }

    fn apply_route(&mut self, action: Result<RouteAction, RouteError>) {
        match action {
            Ok(RouteAction::Computed { handle, bounds }) => {
                info!("Route {} computed", handle);
                if let Some(bounds) = bounds {
                    self.presenter.fit_bounds(&bounds);
                }
            }
            Ok(RouteAction::OriginUpdated(_)) | Ok(RouteAction::Unchanged) => {}
            Err(e) => warn!("Route update failed: {}", e),
        }
    }

    fn arrive(&mut self) {
        self.deactivate_source();
        self.release_route();
        self.session.invalidate();
        if let Err(e) = self.session.transition(NavigationMode::Arrived) {
            warn!("Arrival ignored: {}", e);
            return;
        }
        self.announce_arrival();
    }

    /// Notify the presenter, at most once per session
    fn announce_arrival(&mut self) {
        if self.arrival_announced {
            return;
        }
        self.arrival_announced = true;
        match &self.selected {
            Some(destination) => {
                info!("Arrived at {}", destination.label());
                self.presenter.arrived(destination);
            }
            None => info!("Arrived"),
        }
    }

    fn release_route(&mut self) {
        if let Err(e) = self.routes.deactivate() {
            warn!("Route teardown failed: {}", e);
        }
    }

    fn teardown(&mut self) {
        if let Some(loading) = self.loading.take() {
            loading.abort();
        }
        self.deactivate_source();
        self.release_route();
    }

    /// Abort to `Idle` on invalid input, remembering why
    fn abort(&mut self, e: CoordinateError) -> NavigationError {
        error!("Navigation aborted: {}", e);
        self.teardown();
        self.session.reset();
        self.last_error = Some(NavigationError::InvalidInput(e));
        NavigationError::InvalidInput(e)
    }

    fn warn_location(&mut self, reason: &str) {
        let fallback = if self.has_fix {
            "last known location"
        } else {
            "default location"
        };
        let warning = format!(
            "Couldn't access your location ({}). Using {} instead.",
            reason, fallback
        );
        warn!("{}", warning);
        self.location_warning = Some(warning);
    }

    fn render(&mut self) {
        let frame = self.frame();
        self.presenter.render(&frame);
    }
}

impl<R: RouteService> Drop for NavigationController<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
