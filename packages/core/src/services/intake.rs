//! Intake Service - New Item Fabrication
//!
//! Fabricates the rows the scan workflow later references: physical units
//! with generated ids and, optionally, their fanned-out `location` slot
//! children. The entry form UI lives outside the core; this module is
//! the row-producing half it calls into.
//!
//! # Id convention
//!
//! Generated ids are `"{TYP}-{XXXXXX}"`: the first three letters of the
//! type, uppercased, plus six uppercase hex characters drawn from a v4
//! UUID, regenerated on collision. Slot children append `-0..n`, which
//! is exactly what the [`associate_of`](crate::models::associate_of)
//! convention strips back off.

use std::sync::OnceLock;

use regex::Regex;
use tracing::info;
use uuid::Uuid;

use crate::db::{ChangeSet, NodeStore};
use crate::models::{Node, NodeType, ValidationError};

use super::error::InventoryError;

/// Parameters for one intake request.
#[derive(Debug, Clone)]
pub struct NewItemSpec {
    /// Unit type; `Location` is rejected (slots are only ever fanned out
    /// under an item, never created standalone).
    pub node_type: NodeType,
    /// How many identical units to create.
    pub quantity: usize,
    /// Optional display label shared by all created units.
    pub name: Option<String>,
    /// How many `location` slot children to fan out under each unit.
    pub slot_count: usize,
}

// Generated-id shape: TYP-XXXXXX with an optional trailing slot index.
const NODE_ID_PATTERN: &str = r"^[A-Z]{3}-[A-Z0-9]{6}(-\d+)?$";

/// Validate an id against the generated-id convention.
///
/// Hosts can pre-screen hand-entered ids with this before trusting the
/// associate derivation; ids with extra hyphens resolve surprisingly.
///
/// # Examples
///
/// ```
/// # use shelfspace_core::services::is_valid_node_id;
/// assert!(is_valid_node_id("TRA-1A2B3C"));
/// assert!(is_valid_node_id("TRA-1A2B3C-12"));
/// assert!(!is_valid_node_id("tray_7"));
/// ```
pub fn is_valid_node_id(id: &str) -> bool {
    static NODE_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NODE_ID_REGEX.get_or_init(|| Regex::new(NODE_ID_PATTERN).unwrap());
    regex.is_match(id)
}

fn generate_id(store: &NodeStore, node_type: NodeType) -> String {
    let type_label = node_type.to_string().to_uppercase();
    let prefix: String = type_label.chars().take(3).collect();
    loop {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        let suffix: String = hex.chars().take(6).collect();
        let id = format!("{prefix}-{suffix}");
        if !store.contains(&id) {
            return id;
        }
    }
}

/// Create `quantity` new units (plus `slot_count` slot children each),
/// append them to the store and record every new row in the change set.
///
/// Slot children carry their index as the `location` label and **no**
/// parent pointer: a slot joins the containment tree only through its
/// associate, never as a tree node of its own.
///
/// Returns the ids of the created units (slot ids are derivable).
pub fn create_items(
    store: &mut NodeStore,
    changes: &mut ChangeSet,
    spec: &NewItemSpec,
) -> Result<Vec<String>, InventoryError> {
    if spec.node_type.is_location() {
        return Err(ValidationError::InvalidNodeType(
            "location units are fanned out under an item, not created directly".to_string(),
        )
        .into());
    }

    let mut created = Vec::with_capacity(spec.quantity);
    for _ in 0..spec.quantity {
        let id = generate_id(store, spec.node_type);
        let mut item = Node::new(id.clone(), Some(spec.node_type));
        if let Some(name) = &spec.name {
            item = item.with_name(name.clone());
        }
        store.insert(item)?;
        changes.record(&id);

        for i in 0..spec.slot_count {
            let slot_id = format!("{id}-{i}");
            let slot =
                Node::new(slot_id.clone(), Some(NodeType::Location)).with_location(i.to_string());
            store.insert(slot)?;
            changes.record(&slot_id);
        }
        created.push(id);
    }

    info!(
        node_type = %spec.node_type,
        quantity = spec.quantity,
        slots_each = spec.slot_count,
        "intake created units"
    );
    Ok(created)
}
