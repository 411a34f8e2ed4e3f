use std::collections::BTreeSet;

use serde::Serialize;

use crate::entity::EntityDescriptor;
use crate::error::{Error, Result};
use crate::value::Payload;

/// Check a payload against the descriptor before any SQL is built.
///
/// This checks:
/// - the payload is not empty
/// - every column is a known non-key column of the entity
/// - no column appears twice
pub fn check_payload(descriptor: &EntityDescriptor, payload: &Payload) -> Result<()> {
    if payload.is_empty() {
        return Err(Error::EmptyPayload(descriptor.table.to_string()));
    }

    let mut seen = BTreeSet::new();
    for column in payload.columns() {
        if descriptor.column(column).is_none() {
            return Err(Error::UnknownColumn {
                table: descriptor.table.to_string(),
                column: column.to_string(),
            });
        }
        if !seen.insert(column) {
            return Err(Error::DuplicateColumn {
                table: descriptor.table.to_string(),
                column: column.to_string(),
            });
        }
    }

    Ok(())
}

/// Outcome of the semantic rules: every failure is collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}
