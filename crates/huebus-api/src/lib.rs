//! Huebus API — HTTP surface of the CloudEvents color demo.

pub mod error;
pub mod routes;
pub mod state;
