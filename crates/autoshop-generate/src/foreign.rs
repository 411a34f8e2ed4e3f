//! Foreign key targets must have rows before a batch can reference them.

use sqlx::PgConnection;
use tracing::debug;

use autoshop_core::{Error, ForeignKeyRef, Result};
use autoshop_introspect::map_db_error;

use crate::planner::quote_ident;

pub fn populated_sql(reference: &ForeignKeyRef) -> String {
    format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE {} IS NOT NULL)",
        quote_ident(&reference.table),
        quote_ident(&reference.column)
    )
}

/// `Error::EmptyReference` when the referenced column has nothing to sample.
///
/// Without this check the sampling subquery yields `NULL`, which a nullable
/// FK column would silently accept.
pub async fn ensure_populated(conn: &mut PgConnection, reference: &ForeignKeyRef) -> Result<()> {
    let populated: bool = sqlx::query_scalar(&populated_sql(reference))
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

    debug!(
        table = %reference.table,
        column = %reference.column,
        populated,
        "reference checked"
    );

    if populated {
        Ok(())
    } else {
        Err(Error::EmptyReference(reference.table.clone()))
    }
}
