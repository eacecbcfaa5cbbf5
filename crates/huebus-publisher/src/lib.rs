//! Outbound delivery of CloudEvents to the configured broker.
//!
//! One publish is one HTTP POST, binary-encoded, awaited synchronously.
//! There is no retry and no queue; the caller decides whether a failure
//! propagates (direct client-invoked publishes) or is logged and swallowed
//! (event-to-event hops).

use std::time::Duration;

use thiserror::Error;
use tracing::info;

use huebus_codec::EncodeError;
use huebus_core::event::CloudEvent;

/// Bound on the outbound round trip. A slow broker is a failed publish.
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// A single publish attempt failed.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The event could not be encoded for the wire.
    #[error("failed to encode event: {0}")]
    Encode(#[from] EncodeError),

    /// The broker answered with a non-2xx status.
    #[error("broker rejected event with status {status}")]
    Rejected {
        /// The HTTP status the broker returned.
        status: u16,
        /// The response body, for diagnostics.
        body: String,
    },

    /// The request never completed: connection refused, timeout, DNS.
    #[error("broker unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Publishes binary-encoded CloudEvents to one broker URL.
#[derive(Debug, Clone)]
pub struct BrokerPublisher {
    client: reqwest::Client,
    broker_url: String,
}

impl BrokerPublisher {
    /// Creates a publisher for the given broker URL.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Transport` if the HTTP client cannot be built.
    pub fn new(broker_url: impl Into<String>) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .timeout(PUBLISH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            broker_url: broker_url.into(),
        })
    }

    /// The configured broker URL.
    #[must_use]
    pub fn broker_url(&self) -> &str {
        &self.broker_url
    }

    /// Encodes the event and POSTs it to the broker, awaiting the response.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] on encode failure, a non-2xx broker
    /// response, or a transport-level failure. Exactly one attempt is made.
    pub async fn publish(&self, event: &CloudEvent) -> Result<(), PublishError> {
        let (headers, body) = huebus_codec::encode(event)?;

        info!(event_id = %event.id, event_type = %event.event_type, broker = %self.broker_url, "publishing event");

        let response = self
            .client
            .post(&self.broker_url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!(event_id = %event.id, "event published");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(PublishError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use chrono::Utc;
    use huebus_core::event::COLOR_CHANGED_MANUAL;

    type Captured = Arc<Mutex<Option<(HeaderMap, Bytes)>>>;

    async fn spawn_broker(status: StatusCode) -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(None));
        let seen = captured.clone();
        let app = Router::new().route(
            "/",
            post(move |headers: HeaderMap, body: Bytes| {
                let seen = seen.clone();
                async move {
                    *seen.lock().unwrap() = Some((headers, body));
                    status
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/"), captured)
    }

    fn sample_event() -> CloudEvent {
        CloudEvent::outbound(
            COLOR_CHANGED_MANUAL,
            Utc::now(),
            br#"{"color":"GREEN"}"#.to_vec(),
        )
    }

    #[tokio::test]
    async fn test_publish_sends_binary_mode_and_succeeds_on_2xx() {
        let (url, captured) = spawn_broker(StatusCode::ACCEPTED).await;
        let publisher = BrokerPublisher::new(url).unwrap();
        let event = sample_event();

        publisher.publish(&event).await.unwrap();

        let (headers, body) = captured.lock().unwrap().take().unwrap();
        assert_eq!(headers.get("ce-id").unwrap(), event.id.as_str());
        assert_eq!(headers.get("ce-type").unwrap(), COLOR_CHANGED_MANUAL);
        assert_eq!(headers.get("ce-specversion").unwrap(), "1.0");
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert_eq!(&body[..], &event.data[..]);
    }

    #[tokio::test]
    async fn test_publish_classifies_non_2xx_as_rejected() {
        let (url, _captured) = spawn_broker(StatusCode::INTERNAL_SERVER_ERROR).await;
        let publisher = BrokerPublisher::new(url).unwrap();

        let err = publisher.publish(&sample_event()).await.unwrap_err();

        assert!(matches!(err, PublishError::Rejected { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_publish_classifies_connection_failure_as_transport() {
        // Nothing listens on the discard port.
        let publisher = BrokerPublisher::new("http://127.0.0.1:9/").unwrap();

        let err = publisher.publish(&sample_event()).await.unwrap_err();

        assert!(matches!(err, PublishError::Transport(_)));
    }
}
