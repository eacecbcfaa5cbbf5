//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use huebus_api::routes;
use huebus_api::state::AppState;
use huebus_core::clock::Clock;
use huebus_core::projection::ColorProjection;
use huebus_core::store::{ColorLog, EventStore};
use huebus_publisher::BrokerPublisher;
use huebus_store::{MemoryColorLog, MemoryEventStore};
use huebus_test_support::FixedClock;

/// A broker URL no publish can reach: nothing listens on the discard port.
pub const UNREACHABLE_BROKER: &str = "http://127.0.0.1:9/";

/// Fixed timestamp used across all integration tests.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(fixed_time()))
}

/// Build the full app router with fresh in-memory stores and a deterministic
/// clock. Uses the same route structure as `main.rs`.
pub fn build_test_app(broker_url: &str) -> Router {
    build_test_app_with(
        Arc::new(MemoryEventStore::new()),
        Arc::new(MemoryColorLog::new()),
        broker_url,
    )
}

/// Build the full app router over the given stores, for tests that inject
/// failures or inspect the stores directly.
pub fn build_test_app_with(
    event_store: Arc<dyn EventStore>,
    color_log: Arc<dyn ColorLog>,
    broker_url: &str,
) -> Router {
    let clock = fixed_clock();
    let colors = ColorProjection::new(color_log, clock.clone());
    let publisher = Arc::new(BrokerPublisher::new(broker_url).unwrap());
    let app_state = AppState::new(clock, event_store, colors, publisher);

    Router::new()
        .merge(routes::sink::router())
        .merge(routes::health::router())
        .nest("/api/colors", routes::colors::router())
        .nest("/api/events", routes::events::router())
        .with_state(app_state)
}

/// Requests captured by the mock broker.
pub type BrokerRequests = Arc<Mutex<Vec<(HeaderMap, Bytes)>>>;

/// Spawn a broker that records every request and answers with `status`.
pub async fn spawn_broker(status: StatusCode) -> (String, BrokerRequests) {
    let requests: BrokerRequests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();
    let app = Router::new().route(
        "/",
        post(move |headers: HeaderMap, body: Bytes| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push((headers, body));
                status
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), requests)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a prebuilt request (for binary-mode event posts) and return the
/// status plus the raw body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, body_bytes)
}

/// A binary-mode CloudEvents POST with the standard demo attributes.
pub fn binary_event_request(uri: &str, event_type: &str, payload: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("ce-id", "e1")
        .header("ce-type", event_type)
        .header("ce-source", "svc")
        .header("ce-specversion", "1.0")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_owned()))
        .unwrap()
}
