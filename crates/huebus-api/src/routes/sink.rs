//! The CloudEvents sink: inbound event ingestion and the debug echo.
//!
//! Ingestion is the durability boundary. A request is accepted once its
//! record is persisted; everything after that (projection update, chained
//! re-announce) is best-effort and can only be logged, never turn the
//! already-durable ingestion into a failure.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Json, Router, routing::post};
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, instrument, warn};

use huebus_core::color::Color;
use huebus_core::event::{CloudEvent, COLOR_CHANGED, EventKind};
use huebus_core::store::NewEventRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// POST / and POST /cloudevents
#[instrument(skip_all)]
async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let raw = huebus_codec::decode(&headers, &body)?;
    let received_at = state.clock.now();

    // Defaulting happens here, never in the codec.
    let event_id = raw
        .id
        .unwrap_or_else(|| format!("unknown-{}", received_at.timestamp_millis()));
    let event_type = raw.event_type.unwrap_or_else(|| "unknown.event".to_owned());
    let source = raw.source.unwrap_or_else(|| "unknown-source".to_owned());
    let timestamp = match raw.time.as_deref() {
        None => received_at,
        Some(text) => match text.parse::<DateTime<Utc>>() {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(%err, time = text, "unparsable event time, using receipt time");
                received_at
            }
        },
    };

    let record = state
        .event_store
        .append(NewEventRecord {
            event_id,
            event_type: event_type.clone(),
            source: source.clone(),
            subject: raw.subject,
            timestamp,
            data: String::from_utf8_lossy(&raw.data).into_owned(),
        })
        .await?;

    info!(
        id = record.id,
        event_id = %record.event_id,
        event_type = %record.event_type,
        source = %record.source,
        "stored received event"
    );

    match EventKind::from_type(&event_type) {
        EventKind::ColorChanged => {
            apply_color_change(&state, &source, &raw.data).await;
        }
        EventKind::ColorChangedManual => {
            apply_color_change(&state, &source, &raw.data).await;
            reannounce(&state, &raw.data, received_at).await;
        }
        EventKind::Other => {}
    }

    Ok(StatusCode::ACCEPTED)
}

/// Applies a color-change payload to the projection. Failures are logged
/// and swallowed: the event record is already durable.
async fn apply_color_change(state: &AppState, source: &str, payload: &[u8]) {
    let value: serde_json::Value = match serde_json::from_slice(payload) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, "color event payload is not JSON");
            return;
        }
    };
    let Some(name) = value.get("color").and_then(serde_json::Value::as_str) else {
        warn!("color event payload has no color field");
        return;
    };
    let Some(color) = Color::parse(name) else {
        warn!(color = name, "unknown color in event payload");
        return;
    };

    match state.colors.set(color, format!("event:{source}")).await {
        Ok(change) => info!(color = %change.color, source = %change.source, "applied color change"),
        Err(err) => warn!(%err, "failed to apply color change"),
    }
}

/// Re-announces a manual change as a canonical `color.changed` event.
/// Event-to-event hops are fire-and-forget.
async fn reannounce(state: &AppState, payload: &[u8], now: DateTime<Utc>) {
    let event = CloudEvent::outbound(COLOR_CHANGED, now, payload.to_vec());
    if let Err(err) = state.publisher.publish(&event).await {
        warn!(%err, "failed to re-announce manual color change");
    }
}

/// POST /cloudevents/debug — echoes the request back, for diagnosing what a
/// broker actually delivers.
async fn debug_echo(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<serde_json::Value> {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    Json(json!({
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
        "timestamp": state.clock.now().to_rfc3339(),
    }))
}

/// Returns the sink router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(receive_event))
        .route("/cloudevents", post(receive_event))
        .route("/cloudevents/debug", post(debug_echo))
}
