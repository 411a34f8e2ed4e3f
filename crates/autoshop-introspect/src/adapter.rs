use async_trait::async_trait;

use autoshop_core::{ColumnDescription, Result};

/// Anything able to answer column metadata questions about a table.
#[async_trait]
pub trait Catalog {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Describe `columns` of `table`, in the order given.
    ///
    /// Every column must exist in the catalog; a missing one is
    /// `Error::InvalidSchema`.
    async fn describe_columns(
        &self,
        table: &str,
        columns: &[&str],
    ) -> Result<Vec<ColumnDescription>>;
}
