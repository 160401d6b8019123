//! Sheet Row Boundary Shape
//!
//! The external node table is row-oriented with the columns
//! `id, name, type, parent, child, barcode, location`, where `child` is a
//! comma-joined serialization of the children set and every absent value
//! is an empty string. The core receives and returns nodes in this
//! denormalized shape at the boundary but operates on the structured
//! [`Node`] model internally: the CSV child list is decoded into a proper
//! set immediately at ingestion and re-encoded only here, on the way back
//! out to the persistence collaborator.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::node::{Node, NodeType};

/// One denormalized row of the external node table.
///
/// Empty string means "absent" for every optional column, matching the
/// spreadsheet convention.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub child: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub location: String,
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

impl Node {
    /// Decode a sheet row into the structured model.
    ///
    /// An empty or unranked `type` column becomes `node_type: None`
    /// rather than an error: such rows exist in hand-edited sheets and
    /// must still be renderable by `locate`. The CSV `child` column is
    /// split into a set here, once, at ingestion.
    pub fn from_row(row: Row) -> Node {
        let node_type = row.node_type.parse::<NodeType>().ok();
        let children: BTreeSet<String> = row
            .child
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Node {
            id: row.id,
            node_type,
            name: non_empty(row.name),
            parent: non_empty(row.parent),
            children,
            location: non_empty(row.location),
            barcode: row.barcode,
        }
    }

    /// Encode back into the denormalized sheet shape.
    ///
    /// `children` is a sorted set, so the joined `child` column is
    /// deterministic for a given state.
    pub fn to_row(&self) -> Row {
        let child = self
            .children
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        Row {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_default(),
            node_type: self
                .node_type
                .map(|t| t.to_string())
                .unwrap_or_default(),
            parent: self.parent.clone().unwrap_or_default(),
            child,
            barcode: self.barcode.clone(),
            location: self.location.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        Row {
            id: "TRA-ABC123".to_string(),
            name: "resistor tray".to_string(),
            node_type: "tray".to_string(),
            parent: "SHE-XYZ999".to_string(),
            child: "BOX-AAA111,BOX-BBB222".to_string(),
            barcode: "*TRA-ABC123*".to_string(),
            location: "4".to_string(),
        }
    }

    #[test]
    fn test_decode_splits_child_csv_into_set() {
        let node = Node::from_row(sample_row());
        assert_eq!(node.children.len(), 2);
        assert!(node.children.contains("BOX-AAA111"));
        assert!(node.children.contains("BOX-BBB222"));
    }

    #[test]
    fn test_decode_maps_empty_columns_to_none() {
        let row = Row {
            id: "CAR-Q".to_string(),
            node_type: "cart".to_string(),
            ..Row::default()
        };
        let node = Node::from_row(row);
        assert_eq!(node.name, None);
        assert_eq!(node.parent, None);
        assert_eq!(node.location, None);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_decode_tolerates_unranked_type() {
        let row = Row {
            id: "???-1".to_string(),
            node_type: "widget".to_string(),
            ..Row::default()
        };
        assert_eq!(Node::from_row(row).node_type, None);
    }

    #[test]
    fn test_row_roundtrip_preserves_every_column() {
        let row = sample_row();
        let back = Node::from_row(row.clone()).to_row();
        assert_eq!(back, row);
    }

    #[test]
    fn test_encode_joins_children_sorted() {
        let mut node = Node::new("BOX-Z".to_string(), Some(NodeType::Box));
        node.children.insert("SEP-B".to_string());
        node.children.insert("SEP-A".to_string());
        assert_eq!(node.to_row().child, "SEP-A,SEP-B");
    }

    #[test]
    fn test_decode_skips_blank_csv_entries() {
        let row = Row {
            id: "BOX-Z".to_string(),
            node_type: "box".to_string(),
            child: "SEP-A, ,SEP-B,".to_string(),
            ..Row::default()
        };
        let node = Node::from_row(row);
        assert_eq!(node.children.len(), 2);
    }
}
