//! Generic table gateway for autoshop.
//!
//! One [`Gateway`] type serves every entity: SQL is assembled from the
//! entity descriptor and the caller's typed payload, values are always bound
//! parameters, and rows come back as JSON records.

pub mod gateway;
pub mod guard;
pub mod rules;
pub mod sql;
pub mod store;

pub use gateway::{Created, Gateway};
pub use guard::{DeleteGuard, DELETE_GUARDS, ensure_deletable};
pub use rules::{RecordLookup, validate};
pub use store::Store;
