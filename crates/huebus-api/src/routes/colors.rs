//! Color query/set endpoints, delegating to the projection.

use axum::extract::State;
use axum::{Json, Router, routing::get, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use huebus_core::color::{Color, ColorChange};
use huebus_core::error::DomainError;
use huebus_core::event::{CloudEvent, COLOR_CHANGED_MANUAL};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /set.
#[derive(Debug, Deserialize)]
pub struct SetColorRequest {
    /// Color name, case-insensitive.
    pub color: String,
    /// Attribution; defaults to `"manual"`.
    pub source: Option<String>,
    /// When true, route the change through the broker instead of appending
    /// directly; the change lands when the event is echoed back.
    #[serde(default)]
    pub publish: bool,
}

/// Response body for POST /set.
#[derive(Debug, Serialize)]
pub struct SetColorResponse {
    /// Surrogate key of the appended entry; absent on the publish path,
    /// where nothing is appended locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// The color that was set.
    pub color: Color,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
    /// Attribution.
    pub source: String,
    /// Whether the change went through the broker.
    pub published: bool,
}

/// GET /current
async fn current_color(State(state): State<AppState>) -> Result<Json<ColorChange>, ApiError> {
    Ok(Json(state.colors.current().await?))
}

/// GET /history
async fn color_history(State(state): State<AppState>) -> Result<Json<Vec<ColorChange>>, ApiError> {
    Ok(Json(state.colors.history().await?))
}

/// GET /available
async fn available_colors() -> Json<[Color; 8]> {
    Json(Color::ALL)
}

/// POST /set
#[instrument(skip(state, request), fields(color = %request.color, publish = request.publish))]
async fn set_color(
    State(state): State<AppState>,
    Json(request): Json<SetColorRequest>,
) -> Result<Json<SetColorResponse>, ApiError> {
    let color = Color::parse(&request.color)
        .ok_or_else(|| DomainError::Validation(format!("unknown color: {}", request.color)))?;
    let source = request.source.unwrap_or_else(|| "manual".to_owned());

    if request.publish {
        let timestamp = state.clock.now();
        let payload = serde_json::json!({
            "color": color,
            "timestamp": timestamp,
            "source": source,
        });
        let event = CloudEvent::outbound(
            COLOR_CHANGED_MANUAL,
            timestamp,
            payload.to_string().into_bytes(),
        );

        // A client asked for this publish, so a broker failure must be
        // observable, unlike the fire-and-forget event hops.
        state.publisher.publish(&event).await?;

        info!(color = %color, source = %source, "published manual color change");
        return Ok(Json(SetColorResponse {
            id: None,
            color,
            timestamp,
            source,
            published: true,
        }));
    }

    let change = state.colors.set(color, source).await?;
    info!(id = change.id, color = %change.color, source = %change.source, "set color");
    Ok(Json(SetColorResponse {
        id: Some(change.id),
        color: change.color,
        timestamp: change.timestamp,
        source: change.source,
        published: false,
    }))
}

/// Returns the colors router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/current", get(current_color))
        .route("/history", get(color_history))
        .route("/available", get(available_colors))
        .route("/set", post(set_color))
}
