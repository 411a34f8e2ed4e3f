use serde::{Deserialize, Serialize};

/// Summary of one `generate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub table: String,
    pub rows_requested: u64,
    pub rows_inserted: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(table: impl Into<String>, rows_requested: u64) -> Self {
        Self {
            table: table.into(),
            rows_requested,
            rows_inserted: 0,
            duration_ms: 0,
        }
    }

    /// Every requested row was committed.
    pub fn succeeded(&self) -> bool {
        self.rows_inserted == self.rows_requested
    }
}
