//! Table-Wide Invariant Tests
//!
//! Property test: no matter what the operator scans, in whatever order,
//! the containment invariants hold after every single scan event:
//!
//! 1. every node has at most one parent
//! 2. a non-location node's `children` set is the exact inverse of the
//!    `parent` pointers declaring it
//! 3. a `location` slot seats at most one child
//! 4. a node occupies at most one slot, that slot belongs to its parent,
//!    and the node's `location` label matches the seat's
//!
//! Scans that resolve to errors (hierarchy violations, invalid pairings)
//! are expected along the way; the property is that they never leave the
//! table in a broken state.

use proptest::prelude::*;
use shelfspace_core::db::{MemorySheet, NodeStore};
use shelfspace_core::models::{associate_of, Row};
use shelfspace_core::services::InventoryService;

fn row(id: &str, node_type: &str, location: &str) -> Row {
    Row {
        id: id.to_string(),
        node_type: node_type.to_string(),
        location: location.to_string(),
        barcode: format!("*{id}*"),
        ..Row::default()
    }
}

/// Every scannable id in the fixture, physical units and slots alike.
fn universe() -> Vec<Row> {
    let mut rows = Vec::new();
    for (shelf, seats) in [("SHE-AAAAAA", 3), ("CAR-BBBBBB", 2)] {
        rows.push(row(shelf, if shelf.starts_with("SHE") { "shelf" } else { "cart" }, ""));
        for i in 0..seats {
            rows.push(row(&format!("{shelf}-{i}"), "location", &i.to_string()));
        }
    }
    for tray in ["TRA-111111", "TRA-222222", "TRA-333333"] {
        rows.push(row(tray, "tray", ""));
        for i in 0..2 {
            rows.push(row(&format!("{tray}-{i}"), "location", &i.to_string()));
        }
    }
    for bx in ["BOX-111111", "BOX-222222", "BOX-333333", "BOX-444444"] {
        rows.push(row(bx, "box", ""));
        rows.push(row(&format!("{bx}-0"), "location", "0"));
    }
    rows.push(row("SEP-111111", "separator", ""));
    rows.push(row("SEP-222222", "separator", ""));
    rows
}

fn assert_invariants(store: &NodeStore) {
    for node in store.iter() {
        // Parent pointer resolves and is mirrored in its children set.
        if let Some(parent_id) = &node.parent {
            let parent = store
                .get(parent_id)
                .unwrap_or_else(|| panic!("{}: dangling parent {parent_id}", node.id));
            assert!(
                parent.children.contains(&node.id),
                "{} declares parent {} but is missing from its children",
                node.id,
                parent_id
            );
        }

        if node.is_slot() {
            // Invariant 3: a slot is a single seat.
            assert!(
                node.children.len() <= 1,
                "slot {} seats {} children",
                node.id,
                node.children.len()
            );
            if let Some(occupant_id) = node.children.iter().next() {
                let occupant = store
                    .get(occupant_id)
                    .unwrap_or_else(|| panic!("slot {} seats unknown {occupant_id}", node.id));
                assert_eq!(
                    occupant.parent.as_deref(),
                    Some(associate_of(&node.id)),
                    "occupant of {} is parented elsewhere",
                    node.id
                );
                assert_eq!(
                    occupant.location, node.location,
                    "occupant of {} carries the wrong seat label",
                    node.id
                );
            }
        } else {
            // Invariant 2: children of a physical unit are exactly the
            // nodes declaring it as parent.
            for child_id in &node.children {
                let child = store
                    .get(child_id)
                    .unwrap_or_else(|| panic!("{}: dangling child {child_id}", node.id));
                assert_eq!(
                    child.parent.as_deref(),
                    Some(node.id.as_str()),
                    "{} lists {} but {} is parented elsewhere",
                    node.id,
                    child_id,
                    child_id
                );
            }
        }
    }

    // Invariants 2 & 4 table-wide: each node sits in at most one
    // physical children set and occupies at most one seat.
    for node in store.iter() {
        let holders = store
            .iter()
            .filter(|n| !n.is_slot() && n.children.contains(&node.id))
            .count();
        assert!(
            holders <= 1,
            "{} appears in {} physical children sets",
            node.id,
            holders
        );
        let seats = store
            .iter()
            .filter(|n| n.is_slot() && n.children.contains(&node.id))
            .count();
        assert!(seats <= 1, "{} occupies {} seats", node.id, seats);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_scan_sequences_preserve_invariants(
        picks in prop::collection::vec(0usize..universe().len(), 1..80)
    ) {
        let rows = universe();
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let store = NodeStore::from_rows(rows).unwrap();
        let mut service = InventoryService::new(store, Box::new(MemorySheet::new()));

        for pick in picks {
            // Violations and invalid pairings are legitimate outcomes of
            // a random scan stream; broken state afterwards is not.
            let _ = service.scan(&ids[pick]);
            assert_invariants(service.store());
            prop_assert!(service.pending_changes().is_empty());
        }
    }
}

#[test]
fn fixture_starts_consistent() {
    let store = NodeStore::from_rows(universe()).unwrap();
    assert_invariants(&store);
}
