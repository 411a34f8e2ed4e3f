//! Core contracts for autoshop.
//!
//! Entity descriptors, typed payloads, search criteria, catalog descriptions
//! and the shared error type. Nothing here talks to the database.

pub mod catalog;
pub mod entity;
pub mod error;
pub mod redaction;
pub mod search;
pub mod validation;
pub mod value;

pub use catalog::{ColumnDescription, ForeignKeyRef, TypeFamily};
pub use entity::{ColumnKind, ColumnSpec, Entity, EntityDescriptor, Rule};
pub use error::{Error, Result};
pub use redaction::{RedactedConnection, redact_connection_string};
pub use search::{CarSearch, Criterion, MechanicSearch, Op, SearchCriteria, ServiceRecordSearch};
pub use validation::{Validation, check_payload};
pub use value::{Payload, Record, Value};

/// Maximum rows returned by `read_all`.
pub const READ_ALL_LIMIT: i64 = 100;
