//! Scan Session - Per-Operator State Machine
//!
//! Interprets a sequence of scanned node identifiers as either "still
//! building a batch" or "execute a reparenting command". The session is
//! an explicit value created at operator session start and dropped at
//! session end, never hidden global state. Two states:
//!
//! - `Idle`: nothing pending; any known, ranked scan starts a batch (a
//!   `location` scan is remembered as the pending slot).
//! - `Accumulating`: same-type scans extend the batch; a different
//!   ranked type resolves the batch into a container assignment; a slot
//!   on either side of a single item resolves into a seat assignment.
//!
//! After every resolution (success, shortfall or violation) the
//! session fully resets to `Idle`. There is no retry-from-partial-state;
//! every failure is recoverable by re-scanning.

use tracing::debug;

use crate::db::{ChangeSet, NodeStore};
use crate::models::{associate_of, NodeType};

use super::error::InventoryError;
use super::hierarchy::is_legal_move;
use super::placement;

/// What a single scan event resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// First scan of a batch: remembering the item.
    Started { id: String },
    /// First scan was a `location` slot: remembering it as the pending
    /// seat, waiting for the item.
    SlotRemembered { slot: String },
    /// Same-type scan appended to the pending batch.
    Extended { history: Vec<String> },
    /// Re-scan of the previous node; nothing changed.
    Reconfirmed { history: Vec<String> },
    /// Batch fully assigned into a container.
    Assigned {
        container: String,
        children: Vec<String>,
    },
    /// Batch partially assigned: the container ran out of declared
    /// slots. The committed prefix stays committed.
    Shortfall {
        container: String,
        assigned: Vec<String>,
        unassigned: Vec<String>,
    },
    /// Single item seated in a slot (either scan order).
    Seated {
        child: String,
        associate: String,
        slot: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    Idle,
    Accumulating {
        previous_id: String,
        previous_type: NodeType,
    },
}

/// The per-operator scan state machine.
#[derive(Debug)]
pub struct ScanSession {
    state: ScanState,
    /// Ordered, de-duplicated scan history for the pending batch.
    history: Vec<String>,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
            history: Vec::new(),
        }
    }

    /// True while a batch or pending slot is held.
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, ScanState::Accumulating { .. })
    }

    /// The pending batch, in scan order.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Drop all pending state. Called on every resolution and available
    /// to hosts that expose an explicit "cancel batch" action.
    pub fn reset(&mut self) {
        self.state = ScanState::Idle;
        self.history.clear();
    }

    fn remember(&mut self, id: &str, node_type: NodeType) {
        self.history.push(id.to_string());
        self.state = ScanState::Accumulating {
            previous_id: id.to_string(),
            previous_type: node_type,
        };
    }

    /// Feed one scan event through the state machine.
    ///
    /// Mutations (if the scan resolves a command) are applied to `store`
    /// and recorded in `changes`; the caller owns flushing. An unknown
    /// id leaves the session untouched so a garbled scan cannot destroy
    /// a pending batch; every other error resets to `Idle`.
    pub fn scan(
        &mut self,
        store: &mut NodeStore,
        changes: &mut ChangeSet,
        id: &str,
    ) -> Result<ScanOutcome, InventoryError> {
        let Some(node) = store.get(id) else {
            return Err(InventoryError::node_not_found(id));
        };
        let Some(node_type) = node.node_type else {
            self.reset();
            return Err(InventoryError::unranked_type(id));
        };

        match self.state.clone() {
            ScanState::Idle => {
                self.remember(id, node_type);
                debug!(id = %id, node_type = %node_type, "scan session started");
                if node_type.is_location() {
                    Ok(ScanOutcome::SlotRemembered {
                        slot: id.to_string(),
                    })
                } else {
                    Ok(ScanOutcome::Started { id: id.to_string() })
                }
            }
            ScanState::Accumulating {
                previous_id,
                previous_type,
            } => {
                // Idempotent re-scan, checked before any pairing rules.
                if previous_id == id {
                    return Ok(ScanOutcome::Reconfirmed {
                        history: self.history.clone(),
                    });
                }

                match (previous_type.is_location(), node_type.is_location()) {
                    (false, false) => {
                        self.accumulate_or_assign(store, changes, id, node_type, previous_type)
                    }
                    (true, false) => {
                        // Pending slot, item scanned second.
                        self.reset();
                        placement::assign_single(store, changes, id, &previous_id)?;
                        Ok(ScanOutcome::Seated {
                            child: id.to_string(),
                            associate: associate_of(&previous_id).to_string(),
                            slot: previous_id,
                        })
                    }
                    (false, true) => {
                        // Item pending, slot scanned second.
                        self.reset();
                        placement::assign_single(store, changes, &previous_id, id)?;
                        Ok(ScanOutcome::Seated {
                            child: previous_id,
                            associate: associate_of(id).to_string(),
                            slot: id.to_string(),
                        })
                    }
                    (true, true) => {
                        self.reset();
                        Err(InventoryError::invalid_pairing(previous_id, id))
                    }
                }
            }
        }
    }

    fn accumulate_or_assign(
        &mut self,
        store: &mut NodeStore,
        changes: &mut ChangeSet,
        id: &str,
        node_type: NodeType,
        previous_type: NodeType,
    ) -> Result<ScanOutcome, InventoryError> {
        if node_type == previous_type {
            if !self.history.iter().any(|h| h == id) {
                self.history.push(id.to_string());
            }
            self.state = ScanState::Accumulating {
                previous_id: id.to_string(),
                previous_type,
            };
            return Ok(ScanOutcome::Extended {
                history: self.history.clone(),
            });
        }

        if !is_legal_move(previous_type, node_type) {
            self.reset();
            return Err(InventoryError::hierarchy_violation(
                previous_type.to_string(),
                node_type.to_string(),
            ));
        }

        // Resolution: the scanned node is the container for the batch.
        let batch = std::mem::take(&mut self.history);
        self.reset();
        let report = placement::assign_batch(store, changes, id, &batch)?;
        if report.is_shortfall() {
            Ok(ScanOutcome::Shortfall {
                container: report.container,
                assigned: report.assigned,
                unassigned: report.unassigned,
            })
        } else {
            Ok(ScanOutcome::Assigned {
                container: report.container,
                children: report.assigned,
            })
        }
    }
}
