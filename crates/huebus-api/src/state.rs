//! Shared application state.

use std::sync::Arc;

use huebus_core::clock::Clock;
use huebus_core::projection::ColorProjection;
use huebus_core::store::EventStore;
use huebus_publisher::BrokerPublisher;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Wall clock behind a seam so tests can pin time.
    pub clock: Arc<dyn Clock>,
    /// Append-only log of received events.
    pub event_store: Arc<dyn EventStore>,
    /// The color projection over the color log.
    pub colors: ColorProjection,
    /// Outbound broker delivery.
    pub publisher: Arc<BrokerPublisher>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_store: Arc<dyn EventStore>,
        colors: ColorProjection,
        publisher: Arc<BrokerPublisher>,
    ) -> Self {
        Self {
            clock,
            event_store,
            colors,
            publisher,
        }
    }
}
