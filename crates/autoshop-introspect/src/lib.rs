//! Catalog introspection for autoshop.

pub mod adapter;
pub mod db;
pub mod options;
pub mod postgres;

pub use adapter::Catalog;
pub use db::map_db_error;
pub use options::CatalogOptions;
pub use postgres::PostgresCatalog;
