//! Shared test mocks and utilities for the huebus workspace.

mod clock;
mod store;

pub use clock::FixedClock;
pub use store::{FailingColorLog, FailingEventStore};
