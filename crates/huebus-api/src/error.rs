//! Huebus API — error-to-response mapping.
//!
//! Every failure variant is mapped to a status exactly once, here: decode
//! and validation failures are the caller's fault (400), persistence faults
//! are ours (500), and a rejected or unreachable broker on the direct
//! publish path is a bad gateway (502).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use huebus_codec::DecodeError;
use huebus_core::error::DomainError;
use huebus_publisher::PublishError;

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error wrapper implementing `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed wire input.
    Decode(DecodeError),
    /// Domain-level failure (validation or persistence).
    Domain(DomainError),
    /// Broker delivery failure on the direct publish path.
    Publish(PublishError),
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<PublishError> for ApiError {
    fn from(err: PublishError) -> Self {
        Self::Publish(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.message();
        let (status, error_code) = match &self {
            ApiError::Decode(_) => (StatusCode::BAD_REQUEST, "decode_error"),
            ApiError::Domain(DomainError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::Domain(DomainError::Persistence(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error")
            }
            ApiError::Publish(_) => (StatusCode::BAD_GATEWAY, "publish_error"),
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    fn message(&self) -> String {
        match self {
            ApiError::Decode(err) => err.to_string(),
            ApiError::Domain(err) => err.to_string(),
            ApiError::Publish(err) => err.to_string(),
        }
    }
}
