use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use campus_nav_core::{Coordinate, Generation};
use tokio::sync::mpsc;

/// Payload of a [`SourceEvent`]
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEventKind {
    /// New fix from the device provider
    Position(Coordinate),
    /// Provider failure; non-fatal
    ProviderError(String),
    /// The walking simulation should advance one step
    SimulationTick,
    /// The loading delay elapsed
    LoadingComplete,
}

/// Event queued for the controller, stamped with the session generation
/// that was current when its producer was started
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub generation: Generation,
    pub kind: SourceEventKind,
}

/// Sending half handed to event producers
///
/// Clones share one open flag: closing any clone silences all of them
/// synchronously, so nothing reaches the queue after the owner stops.
#[derive(Debug, Clone)]
pub struct PositionSink {
    tx: mpsc::UnboundedSender<SourceEvent>,
    generation: Generation,
    open: Arc<AtomicBool>,
}

impl PositionSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<SourceEvent>, generation: Generation) -> Self {
        Self {
            tx,
            generation,
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    /// Deliver a fix. Returns false once the sink is closed.
    pub fn update(&self, position: Coordinate) -> bool {
        self.emit(SourceEventKind::Position(position))
    }

    /// Report a provider failure. Returns false once the sink is closed.
    pub fn error(&self, reason: impl Into<String>) -> bool {
        self.emit(SourceEventKind::ProviderError(reason.into()))
    }

    pub(crate) fn tick(&self) -> bool {
        self.emit(SourceEventKind::SimulationTick)
    }

    pub(crate) fn loading_complete(&self) -> bool {
        self.emit(SourceEventKind::LoadingComplete)
    }

    pub(crate) fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    fn emit(&self, kind: SourceEventKind) -> bool {
        if !self.open.load(Ordering::Acquire) {
            return false;
        }
        self.tx
            .send(SourceEvent {
                generation: self.generation,
                kind,
            })
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_carry_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let generation = Generation::default();
        let sink = PositionSink::new(tx, generation);

        assert!(sink.update(Coordinate::new(37.9310, 41.9370)));
        assert!(sink.tick());

        let first = rx.try_recv().unwrap();
        assert_eq!(first.generation, generation);
        assert_eq!(
            first.kind,
            SourceEventKind::Position(Coordinate::new(37.9310, 41.9370))
        );
        assert_eq!(rx.try_recv().unwrap().kind, SourceEventKind::SimulationTick);
    }

    #[test]
    fn test_close_silences_every_clone() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = PositionSink::new(tx, Generation::default());
        let provider_copy = sink.clone();

        sink.close();

        assert!(!provider_copy.is_open());
        assert!(!provider_copy.update(Coordinate::new(37.9310, 41.9370)));
        assert!(!provider_copy.error("lost signal"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_reports_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = PositionSink::new(tx, Generation::default());
        drop(rx);

        assert!(!sink.is_open());
        assert!(!sink.tick());
    }
}
