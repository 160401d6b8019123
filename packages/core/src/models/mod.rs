//! Data Models
//!
//! This module contains the core data structures used throughout Shelfspace:
//!
//! - `Node` - single entity model for every physical unit in the forest
//! - `NodeType` - closed containment-rank enum
//! - `Row` - denormalized sheet shape used at the persistence boundary
//!
//! The containment hierarchy lives entirely in `parent`/`children` edges;
//! `location` slot nodes are resolved to their physical container through
//! the [`associate_of`] naming convention.

mod node;
mod row;

pub use node::{associate_of, Node, NodeType, ValidationError};
pub use row::Row;
