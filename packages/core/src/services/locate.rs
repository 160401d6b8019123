//! Locate Service - Ancestry Path Rendering
//!
//! Read-only: walks a node's parent chain and renders one line per
//! ancestor, root-first, for the operator ("where is this physically?").
//! The raw traversal is leaf-to-root; the returned iterator yields it in
//! reverse. Tolerates nodes with an unset type (rendered as `UNKNOWN`)
//! and stops on dangling parent pointers or cycles instead of looping.

use std::collections::HashSet;

use crate::db::NodeStore;
use crate::models::Node;

use super::error::InventoryError;

/// Lazy, finite, non-restartable root-first path. Consume it once.
#[derive(Debug)]
pub struct LocatePath {
    segments: std::iter::Rev<std::vec::IntoIter<String>>,
}

impl Iterator for LocatePath {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.segments.next()
    }
}

fn render_segment(node: &Node) -> String {
    let type_label = node
        .node_type
        .map(|t| t.to_string().to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let id = node.id.to_uppercase();
    match (&node.name, &node.location) {
        (None, None) => format!("{type_label}: {id} in slot: None"),
        (Some(name), None) => format!("{type_label}, {name}: {id} in slot: None"),
        (None, Some(slot)) => format!("{type_label}: {id} in slot {slot}"),
        (Some(name), Some(slot)) => format!("{type_label}, {name}: {id} in slot {slot}"),
    }
}

/// Render the containment path of a node, root-first.
///
/// # Errors
///
/// `NodeNotFound` if the starting id does not resolve. Dangling parent
/// references further up the chain terminate the walk silently (the
/// sheet is hand-editable; a broken link should not break display).
pub fn locate(store: &NodeStore, id: &str) -> Result<LocatePath, InventoryError> {
    let mut current = Some(
        store
            .get(id)
            .ok_or_else(|| InventoryError::node_not_found(id))?,
    );
    let mut seen: HashSet<&str> = HashSet::new();
    let mut segments: Vec<String> = Vec::new();

    while let Some(node) = current {
        if !seen.insert(node.id.as_str()) {
            break;
        }
        segments.push(render_segment(node));
        current = node.parent.as_deref().and_then(|pid| store.get(pid));
    }

    Ok(LocatePath {
        segments: segments.into_iter().rev(),
    })
}
