use thiserror::Error;

/// Core error type shared across autoshop crates.
///
/// Store failures are classified once, at the sqlx boundary, so callers can
/// tell a rejected statement from an unreachable database.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied data violates a business rule; nothing was sent to the store.
    #[error("validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),
    /// The store rejected the statement because of a FK, unique, not-null or check constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    /// The store could not be reached or the connection broke mid-statement.
    #[error("connectivity failure: {0}")]
    Connectivity(String),
    /// Any other statement error reported by the store.
    #[error("statement rejected: {0}")]
    Rejected(String),
    #[error("unknown column '{column}' for table '{table}'")]
    UnknownColumn { table: String, column: String },
    #[error("column '{column}' supplied more than once for table '{table}'")]
    DuplicateColumn { table: String, column: String },
    #[error("no columns supplied for table '{0}'")]
    EmptyPayload(String),
    #[error("table '{0}' has no single-column primary key")]
    NoPrimaryKey(String),
    /// The catalog disagrees with what the caller expected.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A foreign key target has no rows to sample from.
    #[error("referenced table '{0}' has no rows")]
    EmptyReference(String),
    /// Deleting the row would orphan dependent rows.
    #[error("{0}")]
    Referenced(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience alias for results returned by autoshop crates.
pub type Result<T> = std::result::Result<T, Error>;
