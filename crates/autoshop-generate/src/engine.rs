use std::time::Instant;

use sqlx::{PgConnection, PgPool};
use tracing::{debug, info, warn};

use autoshop_core::{Entity, Result};
use autoshop_introspect::{Catalog, map_db_error};

use crate::foreign::ensure_populated;
use crate::model::GenerationReport;
use crate::planner::{InsertPlan, plan_for};

/// Inserts random rows into one entity's table at a time.
///
/// A batch runs in a single transaction: either every requested row is
/// committed or none is.
#[derive(Debug, Clone)]
pub struct RandomDataGenerator<C> {
    pool: PgPool,
    catalog: C,
}

impl<C> RandomDataGenerator<C>
where
    C: Catalog + Send + Sync,
{
    pub fn new(pool: PgPool, catalog: C) -> Self {
        Self { pool, catalog }
    }

    pub async fn plan(&self, entity: Entity) -> Result<InsertPlan> {
        plan_for(&self.catalog, entity).await
    }

    pub async fn generate(&self, entity: Entity, count: u64) -> Result<GenerationReport> {
        let started = Instant::now();
        let table = entity.descriptor().table;
        let mut report = GenerationReport::new(table, count);

        info!(table, rows = count, engine = self.catalog.engine(), "generation started");

        if count > 0 {
            let plan = self.plan(entity).await.inspect_err(|err| {
                warn!(table, error = %err, "generation failed while describing columns");
            })?;
            report.rows_inserted = self.run_batch(&plan, count).await.inspect_err(|err| {
                warn!(table, rows = count, error = %err, "generation rolled back");
            })?;
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            table,
            rows_inserted = report.rows_inserted,
            duration_ms = report.duration_ms,
            "generation completed"
        );
        Ok(report)
    }

    async fn run_batch(&self, plan: &InsertPlan, count: u64) -> Result<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        match insert_rows(&mut tx, plan, count).await {
            Ok(inserted) => {
                tx.commit().await.map_err(map_db_error)?;
                Ok(inserted)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(table = %plan.table, error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

async fn insert_rows(conn: &mut PgConnection, plan: &InsertPlan, count: u64) -> Result<u64> {
    for reference in plan.references() {
        ensure_populated(conn, reference).await?;
    }

    let sql = plan.sql();
    debug!(table = %plan.table, sql = %sql, "insert planned");

    let mut inserted = 0;
    for _ in 0..count {
        let done = sqlx::query(&sql)
            .execute(&mut *conn)
            .await
            .map_err(map_db_error)?;
        inserted += done.rows_affected();
    }
    Ok(inserted)
}
