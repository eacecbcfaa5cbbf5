//! Store abstractions: the append-only event log and color log.
//!
//! The persistence engine is an external collaborator; these traits are its
//! interface. Adapters must serialize individual appends (each append is
//! atomic) and assign monotonically increasing surrogate keys.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::color::{Color, ColorChange};
use crate::error::DomainError;

/// A received event as persisted: the defaulted attributes plus a
/// store-assigned surrogate key. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Store-assigned surrogate key.
    pub id: i64,
    /// The (defaulted) CloudEvents `id` attribute.
    pub event_id: String,
    /// The (defaulted) `type` attribute.
    pub event_type: String,
    /// The (defaulted) `source` attribute.
    pub source: String,
    /// Optional `subject` attribute.
    pub subject: Option<String>,
    /// Parsed event time, or receipt time when absent/unparsable.
    pub timestamp: DateTime<Utc>,
    /// The event payload, verbatim.
    pub data: String,
}

/// An event record before the store has assigned its key.
#[derive(Debug, Clone)]
pub struct NewEventRecord {
    /// The (defaulted) CloudEvents `id` attribute.
    pub event_id: String,
    /// The (defaulted) `type` attribute.
    pub event_type: String,
    /// The (defaulted) `source` attribute.
    pub source: String,
    /// Optional `subject` attribute.
    pub subject: Option<String>,
    /// Parsed event time, or receipt time when absent/unparsable.
    pub timestamp: DateTime<Utc>,
    /// The event payload, verbatim.
    pub data: String,
}

/// A color log entry before the store has assigned its key.
#[derive(Debug, Clone)]
pub struct NewColorChange {
    /// The color that was set.
    pub color: Color,
    /// When the change happened.
    pub timestamp: DateTime<Utc>,
    /// Who set it.
    pub source: String,
}

/// Append-only persistence of received events.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends one record and returns it with its assigned key.
    async fn append(&self, record: NewEventRecord) -> Result<EventRecord, DomainError>;

    /// All records, newest first (descending timestamp, then key).
    async fn list_recent(&self) -> Result<Vec<EventRecord>, DomainError>;
}

/// Append-only persistence of color changes.
#[async_trait]
pub trait ColorLog: Send + Sync {
    /// Appends one entry and returns it with its assigned key.
    async fn append(&self, entry: NewColorChange) -> Result<ColorChange, DomainError>;

    /// The entry with the maximum timestamp, ties broken by the higher
    /// surrogate key. `None` on an empty log.
    async fn latest(&self) -> Result<Option<ColorChange>, DomainError>;

    /// All entries, newest first (descending timestamp, then key).
    async fn history(&self) -> Result<Vec<ColorChange>, DomainError>;
}
