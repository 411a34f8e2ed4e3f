//! Statement builders.
//!
//! Identifiers pushed here are the descriptor's `'static` names, never the
//! caller's strings: payload and criteria columns are resolved against the
//! descriptor first. Every value goes through `push_bind`, except `NULL`,
//! which is emitted as the untyped literal so it assigns to any column type.

use autoshop_core::{
    EntityDescriptor, Error, Payload, READ_ALL_LIMIT, Result, SearchCriteria, Value,
    check_payload,
};
use sqlx::{Postgres, QueryBuilder};

pub type Builder = QueryBuilder<'static, Postgres>;

/// Alias of the table inside `SELECT` statements.
const ROW_ALIAS: &str = "t";

/// `INSERT ... VALUES (...)`, with `RETURNING <pk>::bigint` when the entity has a key.
pub fn insert(descriptor: &EntityDescriptor, payload: &Payload) -> Result<Builder> {
    check_payload(descriptor, payload)?;

    let mut builder = Builder::new("INSERT INTO ");
    builder.push(descriptor.table).push(" (");
    {
        let mut columns = builder.separated(", ");
        for column in payload.columns() {
            columns.push(resolve_column(descriptor, column)?);
        }
    }
    builder.push(") VALUES (");
    for (index, value) in payload.values().enumerate() {
        if index > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, value);
    }
    builder.push(")");

    if let Some(pk) = descriptor.primary_key {
        builder.push(" RETURNING ").push(pk).push("::bigint AS key");
    }

    Ok(builder)
}

/// `SELECT row_to_json(t) ... LIMIT 100`.
pub fn select_all(descriptor: &EntityDescriptor) -> Builder {
    let mut builder = select(descriptor);
    builder.push(" LIMIT ").push_bind(READ_ALL_LIMIT);
    builder
}

pub fn select_by_pk(descriptor: &EntityDescriptor, key: i64) -> Result<Builder> {
    let pk = descriptor.require_primary_key()?;
    let mut builder = select(descriptor);
    builder
        .push(" WHERE ")
        .push(ROW_ALIAS)
        .push(".")
        .push(pk)
        .push(" = ")
        .push_bind(key);
    Ok(builder)
}

/// `SELECT ... WHERE 1=1 [AND col op $n]...`, one predicate per non-empty criterion.
pub fn search(descriptor: &EntityDescriptor, criteria: &SearchCriteria) -> Result<Builder> {
    if criteria.entity != descriptor.entity {
        return Err(Error::InvalidInput(format!(
            "{} criteria used against {}",
            criteria.entity, descriptor.entity
        )));
    }
    criteria.check(descriptor)?;

    let mut builder = select(descriptor);
    builder.push(" WHERE 1=1");
    for criterion in criteria.active() {
        let column = resolve_searchable(descriptor, &criterion.column)?;
        builder
            .push(" AND ")
            .push(ROW_ALIAS)
            .push(".")
            .push(column)
            .push(" ")
            .push(criterion.op.sql())
            .push(" ");
        push_value(&mut builder, &criterion.value);
    }
    Ok(builder)
}

/// `UPDATE ... SET col = $n, ... WHERE pk = $m` for exactly the supplied columns.
pub fn update(descriptor: &EntityDescriptor, key: i64, payload: &Payload) -> Result<Builder> {
    let pk = descriptor.require_primary_key()?;
    check_payload(descriptor, payload)?;

    let mut builder = Builder::new("UPDATE ");
    builder.push(descriptor.table).push(" SET ");
    for (index, (column, value)) in payload.iter().enumerate() {
        if index > 0 {
            builder.push(", ");
        }
        builder.push(resolve_column(descriptor, column)?).push(" = ");
        push_value(&mut builder, value);
    }
    builder.push(" WHERE ").push(pk).push(" = ").push_bind(key);
    Ok(builder)
}

pub fn delete(descriptor: &EntityDescriptor, key: i64) -> Result<Builder> {
    let pk = descriptor.require_primary_key()?;
    let mut builder = Builder::new("DELETE FROM ");
    builder
        .push(descriptor.table)
        .push(" WHERE ")
        .push(pk)
        .push(" = ")
        .push_bind(key);
    Ok(builder)
}

fn select(descriptor: &EntityDescriptor) -> Builder {
    let mut builder = Builder::new("SELECT row_to_json(");
    builder
        .push(ROW_ALIAS)
        .push(") AS record FROM ")
        .push(descriptor.table)
        .push(" AS ")
        .push(ROW_ALIAS);
    builder
}

fn push_value(builder: &mut Builder, value: &Value) {
    match value {
        Value::Null => {
            builder.push("NULL");
        }
        Value::Bool(value) => {
            builder.push_bind(*value);
        }
        Value::Int(value) => {
            builder.push_bind(*value);
        }
        Value::Float(value) => {
            builder.push_bind(*value);
        }
        Value::Text(value) => {
            builder.push_bind(value.clone());
        }
        Value::Date(value) => {
            builder.push_bind(*value);
        }
        Value::Timestamp(value) => {
            builder.push_bind(*value);
        }
    }
}

fn resolve_column(descriptor: &EntityDescriptor, column: &str) -> Result<&'static str> {
    descriptor
        .column(column)
        .map(|spec| spec.name)
        .ok_or_else(|| Error::UnknownColumn {
            table: descriptor.table.to_string(),
            column: column.to_string(),
        })
}

fn resolve_searchable(descriptor: &EntityDescriptor, column: &str) -> Result<&'static str> {
    match descriptor.primary_key {
        Some(pk) if pk == column => Ok(pk),
        _ => resolve_column(descriptor, column),
    }
}
