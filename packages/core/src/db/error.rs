//! Store Error Types

use thiserror::Error;

/// Errors raised by the in-memory node table.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Two rows share one id. Ids are stable keys and never reused.
    #[error("Duplicate node id: {id}")]
    DuplicateId { id: String },
}

impl StoreError {
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }
}
