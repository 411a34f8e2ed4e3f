use autoshop_core::{ColumnDescription, Error, ForeignKeyRef, Result};

use super::queries::RawForeignKey;

pub fn map_column(
    table: &str,
    column: &str,
    data_type: Option<String>,
    foreign_key: Option<RawForeignKey>,
) -> Result<ColumnDescription> {
    let declared_type = data_type.ok_or_else(|| {
        Error::InvalidSchema(format!("column {table}.{column} not found in catalog"))
    })?;

    Ok(ColumnDescription {
        name: column.to_string(),
        declared_type,
        foreign_key: foreign_key.map(map_foreign_key),
    })
}

fn map_foreign_key(raw: RawForeignKey) -> ForeignKeyRef {
    tracing::trace!(constraint = %raw.constraint_name, "foreign key resolved");
    ForeignKeyRef {
        table: raw.referenced_table,
        column: raw.referenced_column,
    }
}
