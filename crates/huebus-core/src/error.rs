//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A validation error in domain logic (e.g. an unknown color name).
    #[error("validation error: {0}")]
    Validation(String),

    /// A persistence/store error. Never swallowed; callers map it to an
    /// internal server error at the boundary.
    #[error("persistence error: {0}")]
    Persistence(String),
}
