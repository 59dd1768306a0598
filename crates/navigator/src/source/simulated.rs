use std::time::Duration;

use campus_nav_core::{
    Coordinate, SimulationConfig, SimulationStepper, SourceKind, StepOutcome, StepperError,
};
use log::{debug, info};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::{ensure_runtime, PositionSource};
use crate::error::NavigationError;
use crate::location::PositionSink;

/// Walking simulation
///
/// A timer task emits one tick per `tick_interval_ms`; the controller
/// answers each tick with [`step`](Self::step), passing the session's
/// current position. The stepper itself holds no position.
///
/// `start` spawns onto the current tokio runtime and fails with
/// [`NavigationError::RuntimeUnavailable`] outside one.
pub struct SimulatedPositionSource {
    stepper: SimulationStepper,
    ticker: Option<(JoinHandle<()>, PositionSink)>,
}

impl SimulatedPositionSource {
    pub fn new(config: SimulationConfig) -> Result<Self, NavigationError> {
        Ok(Self {
            stepper: SimulationStepper::new(config)?,
            ticker: None,
        })
    }

    pub fn stepper(&self) -> &SimulationStepper {
        &self.stepper
    }

    /// Advance one step from `position` toward `destination`
    ///
    /// The timer is stopped as soon as the stepper stops (arrival or
    /// invalid input).
    pub fn step(
        &mut self,
        position: Coordinate,
        destination: Coordinate,
    ) -> Result<Option<StepOutcome>, StepperError> {
        let outcome = self.stepper.step(position, destination);
        if !self.stepper.is_running() {
            self.stop_ticker();
        }
        outcome
    }

    fn stop_ticker(&mut self) {
        if let Some((handle, sink)) = self.ticker.take() {
            sink.close();
            handle.abort();
            debug!("Simulation ticker stopped after {} ticks", self.stepper.ticks());
        }
    }
}

impl PositionSource for SimulatedPositionSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Simulated
    }

    fn start(&mut self, sink: PositionSink) -> Result<(), NavigationError> {
        if self.ticker.is_some() {
            return Ok(());
        }
        ensure_runtime()?;
        self.stepper.start();

        let period = Duration::from_millis(self.stepper.config().tick_interval_ms);
        let tick_sink = sink.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if !tick_sink.tick() {
                    break;
                }
            }
        });
        info!("Simulation started ({} ms ticks)", period.as_millis());
        self.ticker = Some((handle, sink));
        Ok(())
    }

    fn stop(&mut self) {
        self.stop_ticker();
        self.stepper.stop();
    }

    fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}

impl Drop for SimulatedPositionSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{SourceEvent, SourceEventKind};
    use campus_nav_core::Generation;
    use tokio::sync::mpsc;

    const START: Coordinate = Coordinate::new(37.9310, 41.9370);
    const OFFICE: Coordinate = Coordinate::new(37.9315, 41.9378);

    fn sink() -> (PositionSink, mpsc::UnboundedReceiver<SourceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (PositionSink::new(tx, Generation::default()), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<SourceEvent>) -> usize {
        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.kind, SourceEventKind::SimulationTick);
            count += 1;
        }
        count
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_until_stopped() {
        let mut source = SimulatedPositionSource::new(SimulationConfig::default()).unwrap();
        let (sink, mut rx) = sink();

        source.start(sink).unwrap();
        assert!(source.is_running());
        assert!(source.stepper().is_running());

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(drain(&mut rx), 3);

        source.stop();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(drain(&mut rx), 0);
        assert!(!source.is_running());
        assert!(!source.stepper().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_arrival_stops_ticker() {
        let mut source = SimulatedPositionSource::new(SimulationConfig::default()).unwrap();
        let (sink, mut rx) = sink();
        source.start(sink).unwrap();

        let moved = source.step(START, OFFICE).unwrap();
        assert!(matches!(moved, Some(StepOutcome::Moved(_))));
        assert!(source.is_running());

        assert_eq!(source.step(OFFICE, OFFICE).unwrap(), Some(StepOutcome::Arrived));
        assert!(!source.is_running());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(drain(&mut rx), 0);
        assert_eq!(source.step(START, OFFICE).unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_input_stops_ticker() {
        let mut source = SimulatedPositionSource::new(SimulationConfig::default()).unwrap();
        source.start(sink().0).unwrap();

        let err = source.step(Coordinate::new(f64::NAN, 41.9370), OFFICE).unwrap_err();
        assert!(matches!(err, StepperError::InvalidCoordinate(_)));
        assert!(!source.is_running());
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let mut source = SimulatedPositionSource::new(SimulationConfig::default()).unwrap();
        let (sink, _rx) = sink();

        assert!(matches!(
            source.start(sink),
            Err(NavigationError::RuntimeUnavailable)
        ));
        assert!(!source.is_running());
        assert!(!source.stepper().is_running());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimulationConfig {
            step_deg: -1.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            SimulatedPositionSource::new(config),
            Err(NavigationError::Config(_))
        ));
    }
}
