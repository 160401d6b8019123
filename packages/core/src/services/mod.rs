//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `ScanSession` - per-operator state machine over scanned identifiers
//! - `placement` - reparenting transactions (single seat and batch)
//! - `hierarchy` - static containment-rank legality predicate
//! - `locate` - read-only ancestry path rendering
//! - `intake` - new item fabrication with slot fan-out
//! - `InventoryService` - session orchestration and flush wiring
//!
//! Services coordinate between the data layer and the host application,
//! enforcing the containment invariants on every mutation.

pub mod error;
pub mod hierarchy;
pub mod intake;
pub mod inventory_service;
pub mod locate;
pub mod placement;
pub mod scan_session;

pub use error::InventoryError;
pub use hierarchy::is_legal_move;
pub use intake::{create_items, is_valid_node_id, NewItemSpec};
pub use inventory_service::InventoryService;
pub use locate::{locate, LocatePath};
pub use placement::{assign_batch, assign_single, BatchReport};
pub use scan_session::{ScanOutcome, ScanSession};
