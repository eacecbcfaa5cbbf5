//! The color projection: current state derived from the append-only log.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::color::{Color, ColorChange};
use crate::error::DomainError;
use crate::store::{ColorLog, NewColorChange};

/// Source recorded on the synthetic default entry.
const DEFAULT_SOURCE: &str = "default";

/// Derives the current color from the log and appends new entries.
///
/// "Current" is always recomputed from the full log at read time; no cached
/// pointer exists. Reading an empty log bootstraps exactly one default entry
/// (RED, `"default"`); that path is serialized so concurrent first readers
/// cannot each insert a default.
#[derive(Clone)]
pub struct ColorProjection {
    log: Arc<dyn ColorLog>,
    clock: Arc<dyn Clock>,
    bootstrap: Arc<Mutex<()>>,
}

impl ColorProjection {
    /// Creates a projection over the given log and clock.
    #[must_use]
    pub fn new(log: Arc<dyn ColorLog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            log,
            clock,
            bootstrap: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the current color, bootstrapping the default entry when the
    /// log is empty.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the log cannot be read or the
    /// bootstrap entry cannot be appended.
    pub async fn current(&self) -> Result<ColorChange, DomainError> {
        if let Some(latest) = self.log.latest().await? {
            return Ok(latest);
        }
        // Re-check under the lock: another first reader may have won.
        let _guard = self.bootstrap.lock().await;
        if let Some(latest) = self.log.latest().await? {
            return Ok(latest);
        }
        self.log
            .append(NewColorChange {
                color: Color::Red,
                timestamp: self.clock.now(),
                source: DEFAULT_SOURCE.to_owned(),
            })
            .await
    }

    /// Appends a new entry. Existing entries are never mutated.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the append fails.
    pub async fn set(&self, color: Color, source: String) -> Result<ColorChange, DomainError> {
        self.log
            .append(NewColorChange {
                color,
                timestamp: self.clock.now(),
                source,
            })
            .await
    }

    /// The full log, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the log cannot be read.
    pub async fn history(&self) -> Result<Vec<ColorChange>, DomainError> {
        self.log.history().await
    }
}

impl std::fmt::Debug for ColorProjection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorProjection").finish_non_exhaustive()
    }
}
