//! Huebus API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use huebus_api::routes;
use huebus_api::state::AppState;
use huebus_core::clock::SystemClock;
use huebus_core::projection::ColorProjection;
use huebus_publisher::BrokerPublisher;
use huebus_store::{MemoryColorLog, MemoryEventStore};

/// Default broker ingress, overridable with `BROKER_URL`.
const DEFAULT_BROKER_URL: &str =
    "http://broker-ingress.knative-eventing.svc.cluster.local/huebus/default";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting huebus API server");

    // Read configuration from environment.
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .map_err(|e| format!("PORT must be a valid u16: {e}"))?;
    let broker_url =
        std::env::var("BROKER_URL").unwrap_or_else(|_| DEFAULT_BROKER_URL.to_string());

    // Build application state. The in-memory stores are the reference
    // adapters; a database-backed store would slot in behind the same traits.
    let clock = Arc::new(SystemClock);
    let event_store = Arc::new(MemoryEventStore::new());
    let color_log = Arc::new(MemoryColorLog::new());
    let colors = ColorProjection::new(color_log, clock.clone());
    let publisher = Arc::new(BrokerPublisher::new(broker_url)?);
    let app_state = AppState::new(clock, event_store, colors, publisher);

    // Build router.
    let app = Router::new()
        .merge(routes::sink::router())
        .merge(routes::health::router())
        .nest("/api/colors", routes::colors::router())
        .nest("/api/events", routes::events::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
