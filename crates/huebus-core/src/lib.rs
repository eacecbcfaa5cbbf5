//! Huebus Core — shared domain types and abstractions.
//!
//! This crate defines the color domain, the CloudEvent value type, the
//! store traits that the persistence adapters implement, and the color
//! projection. It contains no HTTP or infrastructure code.

pub mod clock;
pub mod color;
pub mod error;
pub mod event;
pub mod projection;
pub mod store;
