//! Failure-injection stores for exercising persistence-fault paths.

use async_trait::async_trait;

use huebus_core::color::ColorChange;
use huebus_core::error::DomainError;
use huebus_core::store::{ColorLog, EventStore, EventRecord, NewColorChange, NewEventRecord};

fn unavailable() -> DomainError {
    DomainError::Persistence("connection refused".into())
}

/// An event store that always fails. Useful for testing that persistence
/// faults propagate instead of being swallowed.
#[derive(Debug)]
pub struct FailingEventStore;

#[async_trait]
impl EventStore for FailingEventStore {
    async fn append(&self, _record: NewEventRecord) -> Result<EventRecord, DomainError> {
        Err(unavailable())
    }

    async fn list_recent(&self) -> Result<Vec<EventRecord>, DomainError> {
        Err(unavailable())
    }
}

/// A color log that always fails.
#[derive(Debug)]
pub struct FailingColorLog;

#[async_trait]
impl ColorLog for FailingColorLog {
    async fn append(&self, _entry: NewColorChange) -> Result<ColorChange, DomainError> {
        Err(unavailable())
    }

    async fn latest(&self) -> Result<Option<ColorChange>, DomainError> {
        Err(unavailable())
    }

    async fn history(&self) -> Result<Vec<ColorChange>, DomainError> {
        Err(unavailable())
    }
}
