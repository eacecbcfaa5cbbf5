//! In-memory adapters for the huebus store traits.
//!
//! The persistence engine proper is an external collaborator; these adapters
//! are the demo and test implementation of its interface. A database-backed
//! adapter would implement the same traits.

mod memory;

pub use memory::{MemoryColorLog, MemoryEventStore};
