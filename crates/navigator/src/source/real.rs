use std::sync::Arc;

use campus_nav_core::SourceKind;
use log::{debug, info, warn};

use super::PositionSource;
use crate::error::NavigationError;
use crate::location::{LocationOptions, LocationProvider, PositionSink, SubscriptionId};

/// Forwards device fixes from a [`LocationProvider`] subscription
pub struct RealPositionSource {
    provider: Arc<dyn LocationProvider>,
    options: LocationOptions,
    subscription: Option<(SubscriptionId, PositionSink)>,
}

impl RealPositionSource {
    pub fn new(provider: Arc<dyn LocationProvider>, options: LocationOptions) -> Self {
        Self {
            provider,
            options,
            subscription: None,
        }
    }
}

impl PositionSource for RealPositionSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Real
    }

    fn start(&mut self, sink: PositionSink) -> Result<(), NavigationError> {
        if self.subscription.is_some() {
            return Ok(());
        }
        match self.provider.subscribe(sink.clone(), &self.options) {
            Ok(id) => {
                info!("Subscribed to device location ({:?})", id);
                self.subscription = Some((id, sink));
                Ok(())
            }
            Err(e) => {
                warn!("Device location subscription failed: {}", e);
                sink.close();
                Err(NavigationError::LocationUnavailable(e.to_string()))
            }
        }
    }

    fn stop(&mut self) {
        if let Some((id, sink)) = self.subscription.take() {
            sink.close();
            self.provider.unsubscribe(id);
            debug!("Unsubscribed from device location ({:?})", id);
        }
    }

    fn is_running(&self) -> bool {
        self.subscription.is_some()
    }
}

impl Drop for RealPositionSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{LocationError, MockLocationProvider, SourceEvent, SourceEventKind};
    use campus_nav_core::{Coordinate, Generation};
    use tokio::sync::mpsc;

    const START: Coordinate = Coordinate::new(37.9310, 41.9370);

    fn sink() -> (PositionSink, mpsc::UnboundedReceiver<SourceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (PositionSink::new(tx, Generation::default()), rx)
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let provider = Arc::new(MockLocationProvider::new(START));
        let mut source = RealPositionSource::new(provider.clone(), LocationOptions::default());
        let (sink, _rx) = sink();

        source.start(sink.clone()).unwrap();
        source.start(sink).unwrap();
        assert!(source.is_running());
        assert_eq!(provider.subscriber_count(), 1);

        source.stop();
        source.stop();
        assert!(!source.is_running());
        assert_eq!(provider.subscriber_count(), 0);
    }

    #[test]
    fn test_fixes_forwarded_until_stopped() {
        let provider = Arc::new(MockLocationProvider::new(START));
        let mut source = RealPositionSource::new(provider.clone(), LocationOptions::default());
        let (sink, mut rx) = sink();
        let retained = sink.clone();

        source.start(sink).unwrap();
        assert_eq!(provider.push(START), 1);
        assert_eq!(rx.try_recv().unwrap().kind, SourceEventKind::Position(START));

        source.stop();
        assert!(!retained.update(START));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let provider = Arc::new(MockLocationProvider::new(START));
        {
            let mut source = RealPositionSource::new(provider.clone(), LocationOptions::default());
            source.start(sink().0).unwrap();
            assert_eq!(provider.subscriber_count(), 1);
        }
        assert_eq!(provider.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_failure() {
        let provider = Arc::new(MockLocationProvider::unavailable(LocationError::PermissionDenied));
        let mut source = RealPositionSource::new(provider, LocationOptions::default());
        let (sink, _rx) = sink();
        let retained = sink.clone();

        let err = source.start(sink).unwrap_err();
        assert!(matches!(err, NavigationError::LocationUnavailable(_)));
        assert!(!source.is_running());
        assert!(!retained.is_open());
    }
}
