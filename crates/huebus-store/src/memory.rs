//! In-memory append-only logs behind interior mutability.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use huebus_core::color::ColorChange;
use huebus_core::error::DomainError;
use huebus_core::store::{ColorLog, EventRecord, EventStore, NewColorChange, NewEventRecord};

/// In-memory [`EventStore`]: a Vec of records plus a key counter, guarded by
/// one mutex so each append is atomic.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    inner: Mutex<Log<EventRecord>>,
}

/// In-memory [`ColorLog`] with the same locking scheme.
#[derive(Debug, Default)]
pub struct MemoryColorLog {
    inner: Mutex<Log<ColorChange>>,
}

#[derive(Debug)]
struct Log<T> {
    entries: Vec<T>,
    next_id: i64,
}

impl<T> Default for Log<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl MemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryColorLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DomainError {
    DomainError::Persistence("store lock poisoned".into())
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(&self, record: NewEventRecord) -> Result<EventRecord, DomainError> {
        let mut log = self.inner.lock().map_err(|_| poisoned())?;
        let stored = EventRecord {
            id: log.next_id,
            event_id: record.event_id,
            event_type: record.event_type,
            source: record.source,
            subject: record.subject,
            timestamp: record.timestamp,
            data: record.data,
        };
        log.next_id += 1;
        log.entries.push(stored.clone());
        debug!(id = stored.id, event_id = %stored.event_id, "appended event record");
        Ok(stored)
    }

    async fn list_recent(&self) -> Result<Vec<EventRecord>, DomainError> {
        let log = self.inner.lock().map_err(|_| poisoned())?;
        let mut records = log.entries.clone();
        records.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
        Ok(records)
    }
}

#[async_trait]
impl ColorLog for MemoryColorLog {
    async fn append(&self, entry: NewColorChange) -> Result<ColorChange, DomainError> {
        let mut log = self.inner.lock().map_err(|_| poisoned())?;
        let stored = ColorChange {
            id: log.next_id,
            color: entry.color,
            timestamp: entry.timestamp,
            source: entry.source,
        };
        log.next_id += 1;
        log.entries.push(stored.clone());
        debug!(id = stored.id, color = %stored.color, "appended color change");
        Ok(stored)
    }

    async fn latest(&self) -> Result<Option<ColorChange>, DomainError> {
        let log = self.inner.lock().map_err(|_| poisoned())?;
        // Recomputed on every read: max timestamp, ties broken by the
        // higher surrogate key (insertion order).
        Ok(log
            .entries
            .iter()
            .max_by_key(|entry| (entry.timestamp, entry.id))
            .cloned())
    }

    async fn history(&self) -> Result<Vec<ColorChange>, DomainError> {
        let log = self.inner.lock().map_err(|_| poisoned())?;
        let mut entries = log.entries.clone();
        entries.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
        Ok(entries)
    }
}
