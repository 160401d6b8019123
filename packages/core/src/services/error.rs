//! Service Layer Error Types
//!
//! Every error here is recoverable by the operator re-scanning: the scan
//! session resolves each one into a reset plus a diagnostic, and nothing
//! is fatal to the process. Persistence failures are surfaced without
//! unwinding the already-applied in-memory mutation.

use crate::db::StoreError;
use crate::models::ValidationError;
use thiserror::Error;

/// Inventory operation errors
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Scanned id does not resolve to any node. The pending batch is
    /// left untouched (a garbled scan should not destroy the batch).
    #[error("Node not found: {id}")]
    NodeNotFound { id: String },

    /// Scanned node has an empty or unranked `type` column.
    #[error("Node {id} has no ranked type; fix its type column before scanning it")]
    UnrankedType { id: String },

    /// The move breaks the rank-delta-one containment rule.
    #[error("Cannot place type {batch_type} in {container_type}")]
    HierarchyViolation {
        batch_type: String,
        container_type: String,
    },

    /// Two `location` slots scanned back to back.
    #[error("Cannot assign location {second} to location {first}")]
    InvalidPairing { first: String, second: String },

    /// A slot's derived associate id does not resolve to any node.
    #[error("Slot {slot} has no associate node {associate}")]
    MissingAssociate { slot: String, associate: String },

    /// Single-seat assignment attempted against a non-location node.
    #[error("Node {id} is not a location slot")]
    NotASlot { id: String },

    /// Store-level failure (duplicate id on intake).
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    /// Model-level validation failure.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Flush to the persistence collaborator failed. In-memory state is
    /// already mutated and is not rolled back; the change set is kept
    /// for an explicit retry.
    #[error("Persistence flush failed: {0}")]
    Persistence(#[source] anyhow::Error),
}

impl InventoryError {
    /// Create a node not found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create an unranked type error
    pub fn unranked_type(id: impl Into<String>) -> Self {
        Self::UnrankedType { id: id.into() }
    }

    /// Create a hierarchy violation error
    pub fn hierarchy_violation(
        batch_type: impl Into<String>,
        container_type: impl Into<String>,
    ) -> Self {
        Self::HierarchyViolation {
            batch_type: batch_type.into(),
            container_type: container_type.into(),
        }
    }

    /// Create an invalid pairing error
    pub fn invalid_pairing(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::InvalidPairing {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a missing associate error
    pub fn missing_associate(slot: impl Into<String>, associate: impl Into<String>) -> Self {
        Self::MissingAssociate {
            slot: slot.into(),
            associate: associate.into(),
        }
    }

    /// Create a not-a-slot error
    pub fn not_a_slot(id: impl Into<String>) -> Self {
        Self::NotASlot { id: id.into() }
    }
}
