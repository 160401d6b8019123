//! Data Layer
//!
//! This module owns the in-memory node table and the persistence
//! boundary:
//!
//! - `NodeStore` - row-ordered table of all nodes with an id index
//! - `ChangeSet` - dirty-row tracking consumed by the flush path
//! - `RowSink` / `RowSource` - the external spreadsheet collaborator,
//!   abstracted behind synchronous traits
//! - `MemorySheet` - in-memory backend for tests and local snapshots
//!
//! The store assumes exclusive single-session access; see the crate docs
//! for the concurrency contract.

mod change_set;
mod error;
mod node_store;
mod sheet;

pub use change_set::ChangeSet;
pub use error::StoreError;
pub use node_store::NodeStore;
pub use sheet::{MemorySheet, RowSink, RowSource};
