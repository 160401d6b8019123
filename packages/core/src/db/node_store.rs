//! NodeStore - In-Memory Node Table
//!
//! The single mutable structure owned by one operator session. Rows are
//! kept in sheet order (`Vec<Node>`, position = row identity at the
//! persistence boundary) with a hash index by id for lookups. All
//! mutation flows through the placement engine; the store itself only
//! offers primitive accessors plus the one table-wide repair primitive
//! (`scrub_child_everywhere`) both eviction and detachment are built on.
//!
//! # Concurrency
//!
//! Single-threaded by design: one scan event is fully processed before
//! the next is accepted, and the store performs no locking. Sharing the
//! same underlying sheet between concurrent sessions is the hosting
//! application's responsibility.

use std::collections::HashMap;

use crate::models::{Node, Row};

use super::change_set::ChangeSet;
use super::error::StoreError;

/// In-memory table of all nodes, lookup by id, by parent, by children.
#[derive(Debug, Default)]
pub struct NodeStore {
    rows: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a full sheet into a store. Duplicate ids are rejected:
    /// every downstream operation assumes the id index is total.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for row in rows {
            store.insert(Node::from_row(row))?;
        }
        Ok(store)
    }

    /// Append a node as a new row. Returns the row index.
    pub fn insert(&mut self, node: Node) -> Result<usize, StoreError> {
        if self.index.contains_key(&node.id) {
            return Err(StoreError::duplicate_id(&node.id));
        }
        let idx = self.rows.len();
        self.index.insert(node.id.clone(), idx);
        self.rows.push(node);
        Ok(idx)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.rows[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = *self.index.get(id)?;
        Some(&mut self.rows[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Sheet row index for a node id (row identity at the boundary).
    pub fn row_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.rows.iter()
    }

    /// Nodes declaring the given node as parent.
    pub fn children_of(&self, parent_id: &str) -> Vec<&Node> {
        self.rows
            .iter()
            .filter(|n| n.parent.as_deref() == Some(parent_id))
            .collect()
    }

    /// Nodes listing the given id in their `children` set. Under the
    /// containment invariants this is at most one physical unit plus at
    /// most one `location` seat.
    pub fn holders_of(&self, child_id: &str) -> Vec<&Node> {
        self.rows
            .iter()
            .filter(|n| n.children.contains(child_id))
            .collect()
    }

    /// Remove an id from every node's `children` set table-wide,
    /// recording each touched row.
    ///
    /// This is the repair primitive behind eviction and detachment: it
    /// restores the parent/children inversion invariant (and clears any
    /// stale slot seat) before a node is re-seated elsewhere.
    pub fn scrub_child_everywhere(&mut self, child_id: &str, changes: &mut ChangeSet) {
        for node in &mut self.rows {
            if node.children.remove(child_id) {
                changes.record(&node.id);
            }
        }
    }

    /// Encode the dirty rows, keyed by row index, for the persistence
    /// collaborator. Ids no longer resolvable are skipped (cannot happen
    /// through the engine; no deletion path exists in the core).
    pub fn snapshot(&self, changes: &ChangeSet) -> std::collections::BTreeMap<usize, Row> {
        changes
            .ids()
            .filter_map(|id| self.row_index(id).map(|idx| (idx, self.rows[idx].to_row())))
            .collect()
    }
}
