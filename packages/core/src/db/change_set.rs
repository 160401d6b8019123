//! Change Set - Dirty Row Tracking
//!
//! Every placement operation records the ids of the nodes it mutated into
//! a `ChangeSet`. The set is the contract with the persistence
//! collaborator: after an operation it reflects exactly the rows whose
//! in-memory state changed, so a downstream flush never has to recompute
//! deltas. Ids accumulate across operations until a flush succeeds.

use std::collections::BTreeSet;

/// Ordered collection of dirty node ids awaiting persistence.
///
/// Kept as a set keyed by node id (row identity is resolved to a row
/// index at snapshot time by the store). `BTreeSet` gives deterministic
/// flush ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    dirty: BTreeSet<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a node's row as mutated.
    pub fn record(&mut self, id: &str) {
        self.dirty.insert(id.to_string());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dirty.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    /// Iterate dirty ids in deterministic order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Drop all entries. Called only after a successful flush; a failed
    /// flush keeps the set so the operator can retry.
    pub fn clear(&mut self) {
        self.dirty.clear();
    }
}
