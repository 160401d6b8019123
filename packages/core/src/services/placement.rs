//! Placement Engine - Reparenting Transactions
//!
//! Executes the actual graph mutations behind a resolved scan command:
//! single-item seating into a `location` slot and ordered batch
//! assignment into a container's fanned-out slots. Both paths enforce the
//! table-wide invariants:
//!
//! 1. every node has at most one parent
//! 2. `children` sets are the exact inverse of `parent` pointers
//! 3. a `location` slot seats at most one child
//! 4. a non-location node occupies at most one slot at a time
//!
//! Once an operation starts mutating it runs to completion (or to the
//! batch's natural truncation point); every touched row lands in the
//! change set so the downstream flush never recomputes deltas.

use tracing::debug;

use crate::db::{ChangeSet, NodeStore};
use crate::models::{associate_of, NodeType};

use super::error::InventoryError;
use super::hierarchy::is_legal_move;

/// Result of a batch assignment: the committed prefix and the abandoned
/// trailing remainder (non-empty only on a slot shortfall).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub container: String,
    pub assigned: Vec<String>,
    pub unassigned: Vec<String>,
}

impl BatchReport {
    pub fn is_shortfall(&self) -> bool {
        !self.unassigned.is_empty()
    }
}

fn ranked_type(store: &NodeStore, id: &str) -> Result<NodeType, InventoryError> {
    let node = store
        .get(id)
        .ok_or_else(|| InventoryError::node_not_found(id))?;
    node.node_type
        .ok_or_else(|| InventoryError::unranked_type(id))
}

/// Evict whatever currently occupies a slot: clear the occupant's parent
/// and location, then scrub its id out of every `children` set so the
/// inversion invariant holds before anything is re-seated.
///
/// A slot whose recorded occupant no longer resolves is left alone; the
/// seat is overwritten by the caller anyway.
fn evict_occupant(store: &mut NodeStore, changes: &mut ChangeSet, slot_id: &str) {
    let occupant = store
        .get(slot_id)
        .and_then(|slot| slot.children.iter().next().cloned());
    let Some(occupant_id) = occupant else {
        return;
    };
    if let Some(occupant) = store.get_mut(&occupant_id) {
        occupant.parent = None;
        occupant.location = None;
        changes.record(&occupant_id);
        debug!(occupant = %occupant_id, slot = %slot_id, "evicted slot occupant");
    }
    store.scrub_child_everywhere(&occupant_id, changes);
}

/// Pull a node out of the containment tree entirely: no parent pointer,
/// no membership in any `children` set. Its `location` is overwritten by
/// the caller when re-seating.
fn detach(store: &mut NodeStore, changes: &mut ChangeSet, child_id: &str) {
    store.scrub_child_everywhere(child_id, changes);
    if let Some(child) = store.get_mut(child_id) {
        if child.parent.take().is_some() {
            changes.record(child_id);
        }
    }
}

/// Seat a single item in a `location` slot.
///
/// The slot's *associate* (the physical container the slot belongs to,
/// derived from the slot id) is the node that actually becomes the
/// item's parent; the legality check runs against the associate's type,
/// not the slot's sentinel rank. Any current occupant of the slot is
/// evicted first.
///
/// # Errors
///
/// - `NodeNotFound` / `NotASlot` / `UnrankedType` - bad operands, no
///   mutation
/// - `MissingAssociate` - the slot's derived associate id resolves to
///   nothing; the operation aborts without mutating
/// - `HierarchyViolation` - the item's rank is not exactly one below the
///   associate's
pub fn assign_single(
    store: &mut NodeStore,
    changes: &mut ChangeSet,
    child_id: &str,
    slot_id: &str,
) -> Result<(), InventoryError> {
    let slot = store
        .get(slot_id)
        .ok_or_else(|| InventoryError::node_not_found(slot_id))?;
    if !slot.is_slot() {
        return Err(InventoryError::not_a_slot(slot_id));
    }

    let associate_id = associate_of(slot_id).to_string();
    if !store.contains(&associate_id) {
        return Err(InventoryError::missing_associate(slot_id, &associate_id));
    }
    let associate_type = ranked_type(store, &associate_id)?;
    let child_type = ranked_type(store, child_id)?;

    if !is_legal_move(child_type, associate_type) {
        return Err(InventoryError::hierarchy_violation(
            child_type.to_string(),
            associate_type.to_string(),
        ));
    }

    evict_occupant(store, changes, slot_id);
    detach(store, changes, child_id);

    let slot_label = {
        let slot = store
            .get_mut(slot_id)
            .ok_or_else(|| InventoryError::node_not_found(slot_id))?;
        slot.children.clear();
        slot.children.insert(child_id.to_string());
        changes.record(slot_id);
        slot.location.clone()
    };
    if let Some(associate) = store.get_mut(&associate_id) {
        associate.children.insert(child_id.to_string());
        changes.record(&associate_id);
    }
    if let Some(child) = store.get_mut(child_id) {
        child.parent = Some(associate_id.clone());
        child.location = slot_label;
        changes.record(child_id);
    }

    debug!(child = %child_id, slot = %slot_id, associate = %associate_id, "seated item");
    Ok(())
}

/// Assign an ordered batch of items into a container's fanned-out slots
/// `"{container}-0"`, `"{container}-1"`, ... in original scan order.
///
/// The first missing slot truncates the batch: items already processed
/// stay committed, the remainder is abandoned and reported. The caller
/// is expected to have validated the rank rule for the batch type; each
/// item is still required to exist and carry a ranked type before any
/// mutation begins.
pub fn assign_batch(
    store: &mut NodeStore,
    changes: &mut ChangeSet,
    container_id: &str,
    ordered_child_ids: &[String],
) -> Result<BatchReport, InventoryError> {
    if !store.contains(container_id) {
        return Err(InventoryError::node_not_found(container_id));
    }
    // Validate all operands up front so the commit loop cannot fail
    // mid-flight on anything other than the truncation rule.
    for child_id in ordered_child_ids {
        ranked_type(store, child_id)?;
    }

    let mut assigned: Vec<String> = Vec::new();
    for (i, child_id) in ordered_child_ids.iter().enumerate() {
        let slot_id = format!("{container_id}-{i}");
        if !store.contains(&slot_id) {
            break;
        }

        evict_occupant(store, changes, &slot_id);
        detach(store, changes, child_id);

        let slot_label = {
            // contains() checked above; slots are never removed mid-operation
            let Some(slot) = store.get_mut(&slot_id) else {
                break;
            };
            slot.children.clear();
            slot.children.insert(child_id.clone());
            changes.record(&slot_id);
            slot.location.clone()
        };
        if let Some(child) = store.get_mut(child_id) {
            child.parent = Some(container_id.to_string());
            child.location = slot_label;
            changes.record(child_id);
        }
        assigned.push(child_id.clone());
    }

    if !assigned.is_empty() {
        if let Some(container) = store.get_mut(container_id) {
            for id in &assigned {
                container.children.insert(id.clone());
            }
            changes.record(container_id);
        }
    }

    let unassigned = ordered_child_ids[assigned.len()..].to_vec();
    debug!(
        container = %container_id,
        assigned = assigned.len(),
        unassigned = unassigned.len(),
        "batch assignment finished"
    );
    Ok(BatchReport {
        container: container_id.to_string(),
        assigned,
        unassigned,
    })
}
