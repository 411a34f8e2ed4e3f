use autoshop_core::Error;
use sqlx::error::ErrorKind;

/// Classify a sqlx failure into the shared error taxonomy.
pub fn map_db_error(err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation
            | ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => Error::ConstraintViolation(db.message().to_string()),
            _ => Error::Rejected(db.message().to_string()),
        },
        sqlx::Error::Configuration(err) => Error::Config(err.to_string()),
        err @ (sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed) => Error::Connectivity(err.to_string()),
        other => Error::Rejected(other.to_string()),
    }
}
