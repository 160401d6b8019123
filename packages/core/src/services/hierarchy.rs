//! Hierarchy Rules
//!
//! Static legality predicate for containment moves. An item may move
//! directly into a container exactly one containment level "down" the
//! rank table (`machine/shelf/cart = 1, tray = 2, box = 3, separator =
//! 4`): trays onto shelves, boxes into trays, separators into boxes.
//!
//! `location` slots carry a terminal sentinel rank (100) and are never
//! checked against this rule directly; the slot-assignment paths in the
//! placement engine validate the slot's *associate* type against the
//! other side instead.

use crate::models::NodeType;

/// True iff a batch of `batch_type` units may be placed directly into a
/// `container_type` container: the batch must rank exactly one level
/// below the container (`rank(batch) - rank(container) == 1`).
///
/// Equal ranks, reversed ranks and multi-level jumps are all illegal;
/// callers abort the pending batch without mutating anything.
pub fn is_legal_move(batch_type: NodeType, container_type: NodeType) -> bool {
    batch_type.rank() as i64 - container_type.rank() as i64 == 1
}
