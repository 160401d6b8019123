//! Shelfspace Core Business Logic Layer
//!
//! This crate provides the scan-driven placement engine for physical
//! inventory nested in a multi-level containment hierarchy: machines,
//! shelves and carts at the top, trays, boxes and separators below, and
//! `location` slot nodes as the terminal seats items occupy.
//!
//! # Architecture
//!
//! - **Single entity**: one `Node` model for containers, items and slots
//! - **Scan state machine**: a sequence of scanned identifiers is either
//!   "still building a batch" or "execute a reparenting command"
//! - **Invariant-preserving mutation**: all graph edits flow through the
//!   placement engine, which keeps `children` the exact table-wide
//!   inverse of `parent` and every slot seating at most one item
//! - **External persistence**: the spreadsheet service is a collaborator
//!   behind `RowSink`/`RowSource`; flushes are synchronous and never
//!   rolled back on failure
//!
//! # Concurrency
//!
//! Single-threaded and synchronous: one operator session owns the node
//! table, and one scan event is fully processed before the next is
//! accepted. Concurrent sessions over the same sheet are the hosting
//! application's responsibility.
//!
//! # Modules
//!
//! - [`models`] - data structures (Node, NodeType, sheet Row)
//! - [`db`] - in-memory node table, change tracking, sheet boundary
//! - [`services`] - scan session, placement engine, locate, intake

pub mod db;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use db::*;
pub use models::*;
pub use services::*;

/// Install a global `tracing` subscriber honoring `RUST_LOG`.
///
/// Intended for host binaries and manual test runs; calling it twice is
/// a no-op (the second install fails quietly).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
