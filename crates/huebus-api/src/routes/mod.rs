//! Route modules organized by concern.

pub mod colors;
pub mod events;
pub mod health;
pub mod sink;
