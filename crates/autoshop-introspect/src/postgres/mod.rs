use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use autoshop_core::{ColumnDescription, Result};

use crate::adapter::Catalog;
use crate::options::CatalogOptions;

mod mapper;
mod queries;

/// Catalog backed by `information_schema` of a PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
    options: CatalogOptions,
}

impl PostgresCatalog {
    /// Create a catalog over a pre-configured pool, querying the `public` schema.
    pub fn new(pool: PgPool) -> Self {
        Self::with_options(pool, CatalogOptions::default())
    }

    pub fn with_options(pool: PgPool, options: CatalogOptions) -> Self {
        Self { pool, options }
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn describe_columns(
        &self,
        table: &str,
        columns: &[&str],
    ) -> Result<Vec<ColumnDescription>> {
        let schema = self.options.schema.as_str();
        let mut described = Vec::with_capacity(columns.len());

        // One metadata query per column for the type, one for FK participation.
        for column in columns {
            let data_type = queries::fetch_data_type(&self.pool, schema, table, column).await?;
            let foreign_key =
                queries::fetch_foreign_key(&self.pool, schema, table, column).await?;
            let description = mapper::map_column(table, column, data_type, foreign_key)?;
            debug!(
                table,
                column = %description.name,
                declared_type = %description.declared_type,
                foreign_key = description.foreign_key.is_some(),
                "column described"
            );
            described.push(description);
        }

        Ok(described)
    }
}
