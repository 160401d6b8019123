//! Node Data Structures
//!
//! This module defines the core `Node` struct used throughout Shelfspace:
//! a single entity type for every physical unit in the containment forest,
//! from top-level machines and shelves down to the `location` slot nodes
//! that represent individual seats inside a container.
//!
//! # Architecture
//!
//! - **Single entity**: one `Node` struct for containers, items and slots
//! - **Closed type set**: `NodeType` is a tagged enum, so adding a
//!   hierarchy level is a compile-time-checked change
//! - **Inverse edges**: `children` is maintained as the exact table-wide
//!   inverse of `parent` pointers by the placement engine
//!
//! # Examples
//!
//! ```rust
//! use shelfspace_core::models::{Node, NodeType};
//!
//! let tray = Node::new("TRA-A1B2C3".to_string(), Some(NodeType::Tray));
//! assert_eq!(tray.node_type, Some(NodeType::Tray));
//! assert!(tray.parent.is_none());
//! assert!(tray.children.is_empty());
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for Node operations
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid node type: {0}")]
    InvalidNodeType(String),

    #[error("Invalid node ID format: {0}")]
    InvalidId(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),
}

/// Physical unit categories, ordered by containment rank.
///
/// The rank encodes how deep in the containment hierarchy a unit sits:
/// smaller rank = larger/outer container. `Machine`, `Shelf` and `Cart`
/// share rank 1 (all three are top-level containers). `Location` carries
/// a terminal sentinel rank and is never checked by the rank-delta rule
/// directly; slot moves validate against the slot's *associate* instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Machine,
    Shelf,
    Cart,
    Tray,
    Box,
    Separator,
    Location,
}

impl NodeType {
    /// Containment rank. Smaller rank = larger/outer container.
    pub fn rank(self) -> u32 {
        match self {
            NodeType::Machine => 1,
            NodeType::Shelf => 1,
            NodeType::Cart => 1,
            NodeType::Tray => 2,
            NodeType::Box => 3,
            NodeType::Separator => 4,
            NodeType::Location => 100,
        }
    }

    /// True for `location` slot nodes.
    pub fn is_location(self) -> bool {
        matches!(self, NodeType::Location)
    }
}

impl FromStr for NodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "machine" => Ok(NodeType::Machine),
            "shelf" => Ok(NodeType::Shelf),
            "cart" => Ok(NodeType::Cart),
            "tray" => Ok(NodeType::Tray),
            "box" => Ok(NodeType::Box),
            "separator" => Ok(NodeType::Separator),
            "location" => Ok(NodeType::Location),
            other => Err(ValidationError::InvalidNodeType(other.to_string())),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeType::Machine => "machine",
            NodeType::Shelf => "shelf",
            NodeType::Cart => "cart",
            NodeType::Tray => "tray",
            NodeType::Box => "box",
            NodeType::Separator => "separator",
            NodeType::Location => "location",
        };
        f.write_str(s)
    }
}

/// A single inventory entity (container, item or slot) in the
/// containment forest.
///
/// # Fields
///
/// - `id`: unique identifier (stable key, never reused)
/// - `node_type`: `None` models a row whose `type` column is empty or
///   unranked; such nodes are tolerated by path rendering and rejected
///   by scan handling
/// - `name`: optional display label
/// - `parent`: at most one parent node id (`None` = root)
/// - `children`: ids of nodes that declare this node as parent; the
///   placement engine keeps this the exact table-wide inverse of all
///   `parent` pointers
/// - `location`: free-text slot label, set only while seated inside a
///   `location` node
/// - `barcode`: opaque label text carried through from the sheet
///   (`*ID*` convention); the core never interprets it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub node_type: Option<NodeType>,
    pub name: Option<String>,
    pub parent: Option<String>,
    pub children: BTreeSet<String>,
    pub location: Option<String>,
    pub barcode: String,
}

impl Node {
    /// Create a bare node with no relationships.
    pub fn new(id: String, node_type: Option<NodeType>) -> Self {
        let barcode = format!("*{id}*");
        Self {
            id,
            node_type,
            name: None,
            parent: None,
            children: BTreeSet::new(),
            location: None,
            barcode,
        }
    }

    /// Builder-style display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// Builder-style slot label (used when fabricating `location` rows).
    pub fn with_location(mut self, label: impl Into<String>) -> Self {
        self.location = Some(label.into());
        self
    }

    /// True if this node is a `location` slot.
    pub fn is_slot(&self) -> bool {
        self.node_type.is_some_and(NodeType::is_location)
    }
}

/// Resolve the physical container a `location` slot belongs to.
///
/// Slots are auto-fanned-out as `"<containerId>-0"`, `"<containerId>-1"`,
/// ... so the associate is obtained by stripping the trailing `-N`
/// segment, but only when the id contains more than one hyphen (plain
/// ids like `"SHELF-A"` are their own associate). This is a naming
/// convention, not a stored foreign key; it is isolated here so it can
/// be replaced by an explicit edge without touching mutation code.
///
/// # Examples
///
/// ```rust
/// use shelfspace_core::models::associate_of;
///
/// assert_eq!(associate_of("BOX-QWERTY-0"), "BOX-QWERTY");
/// assert_eq!(associate_of("BOX-QWERTY"), "BOX-QWERTY");
/// assert_eq!(associate_of("standalone"), "standalone");
/// ```
pub fn associate_of(slot_id: &str) -> &str {
    if slot_id.matches('-').count() > 1 {
        match slot_id.rsplit_once('-') {
            Some((stem, _)) => stem,
            None => slot_id,
        }
    } else {
        slot_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_table() {
        assert_eq!(NodeType::Machine.rank(), 1);
        assert_eq!(NodeType::Shelf.rank(), 1);
        assert_eq!(NodeType::Cart.rank(), 1);
        assert_eq!(NodeType::Tray.rank(), 2);
        assert_eq!(NodeType::Box.rank(), 3);
        assert_eq!(NodeType::Separator.rank(), 4);
        assert_eq!(NodeType::Location.rank(), 100);
    }

    #[test]
    fn test_node_type_parse_roundtrip() {
        for name in [
            "machine",
            "shelf",
            "cart",
            "tray",
            "box",
            "separator",
            "location",
        ] {
            let parsed: NodeType = name.parse().unwrap();
            assert_eq!(parsed.to_string(), name);
        }
    }

    #[test]
    fn test_node_type_parse_is_case_insensitive() {
        assert_eq!("Tray".parse::<NodeType>().unwrap(), NodeType::Tray);
        assert_eq!(" BOX ".parse::<NodeType>().unwrap(), NodeType::Box);
    }

    #[test]
    fn test_unranked_type_is_invalid() {
        assert!("pallet".parse::<NodeType>().is_err());
        assert!("".parse::<NodeType>().is_err());
    }

    #[test]
    fn test_associate_strips_trailing_segment_with_two_hyphens() {
        assert_eq!(associate_of("TRA-ABC123-0"), "TRA-ABC123");
        assert_eq!(associate_of("TRA-ABC123-15"), "TRA-ABC123");
    }

    #[test]
    fn test_associate_of_single_hyphen_id_is_itself() {
        assert_eq!(associate_of("TRA-ABC123"), "TRA-ABC123");
        assert_eq!(associate_of("plain"), "plain");
    }

    #[test]
    fn test_new_node_barcode_convention() {
        let node = Node::new("BOX-XYZ".to_string(), Some(NodeType::Box));
        assert_eq!(node.barcode, "*BOX-XYZ*");
    }
}
