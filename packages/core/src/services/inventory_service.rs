//! Inventory Service - Session Orchestration
//!
//! The one object a host application talks to: it owns the node table,
//! the operator's scan session, the pending change set and the
//! persistence sink, and wires them together:
//!
//! - `scan` drives the state machine and flushes the change set after
//!   every mutating resolution
//! - `flush` is the explicit operator-requested flush
//! - `locate` renders a node's containment path
//! - `create_items` feeds the intake workflow
//!
//! One scan event is fully processed (transition + mutation + change-set
//! emission + flush) before the next is accepted. A failed flush is
//! surfaced but never unwinds the in-memory mutation; the change set is
//! retained so `flush` can be retried.

use tracing::{info, warn};

use crate::db::{ChangeSet, NodeStore, RowSink, RowSource};
use crate::models::Node;

use super::error::InventoryError;
use super::intake::{self, NewItemSpec};
use super::locate::{self, LocatePath};
use super::scan_session::{ScanOutcome, ScanSession};

/// Orchestrates one operator session over one node table.
pub struct InventoryService {
    store: NodeStore,
    session: ScanSession,
    changes: ChangeSet,
    sink: Box<dyn RowSink>,
}

impl InventoryService {
    /// Wrap an already-decoded store.
    pub fn new(store: NodeStore, sink: Box<dyn RowSink>) -> Self {
        Self {
            store,
            session: ScanSession::new(),
            changes: ChangeSet::new(),
            sink,
        }
    }

    /// Load the full table from a source and start a fresh session.
    pub fn from_source(
        source: &mut dyn RowSource,
        sink: Box<dyn RowSink>,
    ) -> Result<Self, InventoryError> {
        let rows = source.load().map_err(InventoryError::Persistence)?;
        let store = NodeStore::from_rows(rows)?;
        info!(nodes = store.len(), "inventory loaded");
        Ok(Self::new(store, sink))
    }

    /// Feed one scanned identifier through the session.
    ///
    /// Mutating outcomes (`Assigned`, `Shortfall`, `Seated`) trigger a
    /// synchronous flush of the change set. Diagnostics are logged here;
    /// callers get the structured error or outcome either way.
    pub fn scan(&mut self, id: &str) -> Result<ScanOutcome, InventoryError> {
        let outcome = self
            .session
            .scan(&mut self.store, &mut self.changes, id)
            .inspect_err(|e| warn!(id = %id, "scan rejected: {e}"))?;

        match &outcome {
            ScanOutcome::Assigned {
                container,
                children,
            } => {
                info!(container = %container, count = children.len(), "assigned batch");
                self.flush()?;
            }
            ScanOutcome::Shortfall {
                container,
                assigned,
                unassigned,
            } => {
                warn!(
                    container = %container,
                    assigned = ?assigned,
                    unassigned = ?unassigned,
                    "batch shortfall: container ran out of slots"
                );
                self.flush()?;
            }
            ScanOutcome::Seated {
                child, associate, ..
            } => {
                info!(child = %child, associate = %associate, "seated item");
                self.flush()?;
            }
            ScanOutcome::Started { .. }
            | ScanOutcome::SlotRemembered { .. }
            | ScanOutcome::Extended { .. }
            | ScanOutcome::Reconfirmed { .. } => {}
        }
        Ok(outcome)
    }

    /// Push all dirty rows to the sink. Clears the change set only on
    /// success; a failure keeps it intact for a retry.
    pub fn flush(&mut self) -> Result<(), InventoryError> {
        if self.changes.is_empty() {
            return Ok(());
        }
        let rows = self.store.snapshot(&self.changes);
        match self.sink.flush(rows) {
            Ok(()) => {
                self.changes.clear();
                Ok(())
            }
            Err(e) => {
                warn!("flush failed, keeping {} dirty rows: {e}", self.changes.len());
                Err(InventoryError::Persistence(e))
            }
        }
    }

    /// Render a node's containment path, root-first. Read-only.
    pub fn locate(&self, id: &str) -> Result<LocatePath, InventoryError> {
        locate::locate(&self.store, id)
    }

    /// Fabricate new units (and their slot children) and flush them.
    pub fn create_items(&mut self, spec: &NewItemSpec) -> Result<Vec<String>, InventoryError> {
        let ids = intake::create_items(&mut self.store, &mut self.changes, spec)?;
        self.flush()?;
        Ok(ids)
    }

    /// Abandon the pending batch without mutating anything.
    pub fn cancel_batch(&mut self) {
        self.session.reset();
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.store.get(id)
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// Rows mutated but not yet flushed (non-empty only after a failed
    /// flush, or between explicit-flush workflows).
    pub fn pending_changes(&self) -> &ChangeSet {
        &self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemorySheet;
    use crate::models::{NodeType, Row};
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    /// Sink handle the test can keep a view on after handing the service
    /// its half.
    #[derive(Clone, Default)]
    struct SharedSheet(Rc<RefCell<MemorySheet>>);

    impl RowSink for SharedSheet {
        fn flush(&mut self, rows: BTreeMap<usize, Row>) -> anyhow::Result<()> {
            self.0.borrow_mut().flush(rows)
        }
    }

    struct FailingSink;

    impl RowSink for FailingSink {
        fn flush(&mut self, _rows: BTreeMap<usize, Row>) -> anyhow::Result<()> {
            Err(anyhow!("sheet unreachable"))
        }
    }

    fn row(id: &str, node_type: &str, location: &str) -> Row {
        Row {
            id: id.to_string(),
            node_type: node_type.to_string(),
            location: location.to_string(),
            barcode: format!("*{id}*"),
            ..Row::default()
        }
    }

    fn seeded_store() -> NodeStore {
        NodeStore::from_rows(vec![
            row("SHE-AAAAAA", "shelf", ""),
            row("SHE-AAAAAA-0", "location", "0"),
            row("TRA-BBBBBB", "tray", ""),
        ])
        .unwrap()
    }

    #[test]
    fn test_scan_seat_flushes_rows_to_sink() {
        let sheet = SharedSheet::default();
        let mut service = InventoryService::new(seeded_store(), Box::new(sheet.clone()));

        service.scan("TRA-BBBBBB").unwrap();
        let outcome = service.scan("SHE-AAAAAA-0").unwrap();
        assert!(matches!(outcome, ScanOutcome::Seated { .. }));

        // All three rows were mutated and flushed; the change set drained.
        assert!(service.pending_changes().is_empty());
        let flushed = sheet.0.borrow();
        let tray = flushed.row(2).unwrap();
        assert_eq!(tray.parent, "SHE-AAAAAA");
        assert_eq!(tray.location, "0");
        let slot = flushed.row(1).unwrap();
        assert_eq!(slot.child, "TRA-BBBBBB");
        let shelf = flushed.row(0).unwrap();
        assert_eq!(shelf.child, "TRA-BBBBBB");
    }

    #[test]
    fn test_failed_flush_keeps_mutation_and_dirty_set() {
        let mut service = InventoryService::new(seeded_store(), Box::new(FailingSink));

        service.scan("TRA-BBBBBB").unwrap();
        let err = service.scan("SHE-AAAAAA-0").unwrap_err();

        assert!(matches!(err, InventoryError::Persistence(_)));
        // In-memory seating survived the failed flush.
        let tray = service.node("TRA-BBBBBB").unwrap();
        assert_eq!(tray.parent.as_deref(), Some("SHE-AAAAAA"));
        assert_eq!(service.pending_changes().len(), 3);
    }

    #[test]
    fn test_explicit_flush_retries_after_failure() {
        let sheet = SharedSheet::default();
        let mut service = InventoryService::new(seeded_store(), Box::new(FailingSink));
        service.scan("TRA-BBBBBB").unwrap();
        service.scan("SHE-AAAAAA-0").unwrap_err();

        // Swap in a working sink, as a host reconnecting would.
        service.sink = Box::new(sheet.clone());
        service.flush().unwrap();
        assert!(service.pending_changes().is_empty());
        assert_eq!(sheet.0.borrow().row(2).unwrap().parent, "SHE-AAAAAA");
    }

    #[test]
    fn test_from_source_roundtrip() {
        let mut source = MemorySheet::with_rows(vec![
            row("CAR-CCCCCC", "cart", ""),
            row("TRA-DDDDDD", "tray", ""),
        ]);
        let service =
            InventoryService::from_source(&mut source, Box::new(SharedSheet::default())).unwrap();
        assert_eq!(service.store().len(), 2);
        assert_eq!(
            service.node("CAR-CCCCCC").unwrap().node_type,
            Some(NodeType::Cart)
        );
    }

    #[test]
    fn test_create_items_flushes_new_rows() {
        let sheet = SharedSheet::default();
        let mut service = InventoryService::new(NodeStore::new(), Box::new(sheet.clone()));
        let ids = service
            .create_items(&NewItemSpec {
                node_type: NodeType::Tray,
                quantity: 1,
                name: None,
                slot_count: 2,
            })
            .unwrap();

        assert_eq!(sheet.0.borrow().rows().len(), 3);
        assert_eq!(sheet.0.borrow().row(0).unwrap().id, ids[0]);
        assert!(service.pending_changes().is_empty());
    }

    #[test]
    fn test_cancel_batch_drops_pending_state() {
        let mut service = InventoryService::new(seeded_store(), Box::new(SharedSheet::default()));
        service.scan("TRA-BBBBBB").unwrap();
        service.cancel_batch();
        let outcome = service.scan("TRA-BBBBBB").unwrap();
        assert!(matches!(outcome, ScanOutcome::Started { .. }));
    }
}
