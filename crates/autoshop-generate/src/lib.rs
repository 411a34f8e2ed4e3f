//! Schema-driven random data generation for autoshop.
//!
//! Column types and foreign keys are discovered through a [`Catalog`], turned
//! into store-side value expressions, and inserted in one transaction per
//! batch.
//!
//! [`Catalog`]: autoshop_introspect::Catalog

pub mod engine;
pub mod foreign;
pub mod model;
pub mod planner;

pub use engine::RandomDataGenerator;
pub use model::GenerationReport;
pub use planner::{InsertPlan, ValueExpr, plan_insert, plan_for, quote_ident};
