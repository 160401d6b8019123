//! Sheet Backend Abstraction
//!
//! The remote spreadsheet service is an external collaborator: the core
//! only ever hands it full rows keyed by row index and receives full rows
//! back at session start. The two traits below are that boundary. They
//! are synchronous: a flush is one blocking call made after a
//! completed placement, and a failed flush never unwinds the in-memory
//! mutation (the change set is simply retained for a retry).
//!
//! `MemorySheet` is the in-memory implementation used by tests and by
//! hosts that want to run against a local snapshot.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::models::Row;

/// Write half of the persistence boundary.
pub trait RowSink {
    /// Persist the given rows at their row indices. Invoked synchronously
    /// after every successful placement or at explicit operator request.
    fn flush(&mut self, rows: BTreeMap<usize, Row>) -> Result<()>;
}

/// Read half of the persistence boundary.
pub trait RowSource {
    /// Fetch the full node table, in row order.
    fn load(&mut self) -> Result<Vec<Row>>;
}

/// In-memory sheet, rows addressed by index. Gaps created by
/// out-of-range writes are filled with default (blank) rows, mirroring
/// how a spreadsheet append lands at a fixed row number.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    rows: Vec<Row>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }
}

impl RowSink for MemorySheet {
    fn flush(&mut self, rows: BTreeMap<usize, Row>) -> Result<()> {
        for (index, row) in rows {
            if index >= self.rows.len() {
                self.rows.resize(index + 1, Row::default());
            }
            self.rows[index] = row;
        }
        Ok(())
    }
}

impl RowSource for MemorySheet {
    fn load(&mut self) -> Result<Vec<Row>> {
        Ok(self.rows.clone())
    }
}
