//! Listing of stored event records.

use axum::extract::State;
use axum::{Json, Router, routing::get};

use huebus_core::store::EventRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// GET / — all received events, newest first.
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventRecord>>, ApiError> {
    Ok(Json(state.event_store.list_recent().await?))
}

/// Returns the events router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_events))
}
