//! CloudEvent value type and event-type routing.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The one CloudEvents spec version this system speaks.
pub const SPEC_VERSION: &str = "1.0";

/// Event type emitted when the color changes via an event hop.
pub const COLOR_CHANGED: &str = "color.changed";

/// Event type published when a client changes the color through the API.
pub const COLOR_CHANGED_MANUAL: &str = "color.changed.manual";

/// Source attribute stamped on every event this service publishes.
pub const EVENT_SOURCE: &str = "huebus-api";

/// An in-memory CloudEvent with all mandatory attributes present.
///
/// Decoded wire input lives in the codec's pre-defaulting type; this type is
/// what the application builds for outbound publishes, after every attribute
/// has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudEvent {
    /// Producer-unique identifier. Not enforced unique here.
    pub id: String,
    /// Event semantics, used for routing.
    pub event_type: String,
    /// URI-like producer origin.
    pub source: String,
    /// Protocol version, fixed to [`SPEC_VERSION`].
    pub spec_version: String,
    /// Optional free-form subject.
    pub subject: Option<String>,
    /// Optional event timestamp.
    pub time: Option<DateTime<Utc>>,
    /// MIME type of `data`; `application/json` for this system's payloads.
    pub data_content_type: Option<String>,
    /// Opaque payload. Never parsed by the codec.
    pub data: Vec<u8>,
}

impl CloudEvent {
    /// Builds an outbound event with a fresh id and a JSON payload.
    #[must_use]
    pub fn outbound(
        event_type: &str,
        time: DateTime<Utc>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type: event_type.to_owned(),
            source: EVENT_SOURCE.to_owned(),
            spec_version: SPEC_VERSION.to_owned(),
            subject: None,
            time: Some(time),
            data_content_type: Some("application/json".to_owned()),
            data,
        }
    }
}

/// Closed dispatch over the event types this system reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A color change carried by an event hop.
    ColorChanged,
    /// A color change a client published through the API.
    ColorChangedManual,
    /// Anything else: stored, never acted on.
    Other,
}

impl EventKind {
    /// Classifies a wire `type` attribute.
    #[must_use]
    pub fn from_type(event_type: &str) -> Self {
        match event_type {
            COLOR_CHANGED => EventKind::ColorChanged,
            COLOR_CHANGED_MANUAL => EventKind::ColorChangedManual,
            _ => EventKind::Other,
        }
    }
}
