use std::time::Instant;

use serde::Serialize;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::{debug, info, warn};

use autoshop_core::{EntityDescriptor, Error, Payload, Record, Result, SearchCriteria};
use autoshop_introspect::map_db_error;

use crate::sql::{self, Builder};

/// Outcome of a successful insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Created {
    /// Store-assigned primary key.
    Key(i64),
    /// Affected rows, for entities without a single-column key.
    Rows(u64),
}

/// CRUD and search against one entity's table.
///
/// Every call is a single statement; failures are logged here and returned,
/// and a failed statement leaves the table as it was.
#[derive(Debug, Clone, Copy)]
pub struct Gateway<'a> {
    pool: &'a PgPool,
    descriptor: &'static EntityDescriptor,
}

impl<'a> Gateway<'a> {
    pub fn new(pool: &'a PgPool, descriptor: &'static EntityDescriptor) -> Self {
        Self { pool, descriptor }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    pub async fn create(&self, payload: &Payload) -> Result<Created> {
        let mut builder = self.prepare("create", sql::insert(self.descriptor, payload))?;

        let outcome = if self.descriptor.primary_key.is_some() {
            builder
                .build_query_scalar::<i64>()
                .fetch_one(self.pool)
                .await
                .map(Created::Key)
        } else {
            builder
                .build()
                .execute(self.pool)
                .await
                .map(|done| Created::Rows(done.rows_affected()))
        };
        let created = outcome.map_err(|err| self.fail("create", err))?;

        info!(table = self.descriptor.table, operation = "create", ?created, "row created");
        Ok(created)
    }

    /// At most `READ_ALL_LIMIT` rows in the store's scan order.
    pub async fn read_all(&self) -> Result<Vec<Record>> {
        let builder = sql::select_all(self.descriptor);
        self.fetch_records("read_all", builder).await
    }

    /// `Ok(None)` when no row has this key.
    pub async fn read_by_pk(&self, key: i64) -> Result<Option<Record>> {
        let mut builder = self.prepare("read_by_pk", sql::select_by_pk(self.descriptor, key))?;
        let record = builder
            .build_query_scalar::<Json<Record>>()
            .fetch_optional(self.pool)
            .await
            .map_err(|err| self.fail("read_by_pk", err))?;
        Ok(record.map(|Json(record)| record))
    }

    /// Rows affected; zero when the key does not exist.
    pub async fn update(&self, key: i64, payload: &Payload) -> Result<u64> {
        let builder = self.prepare("update", sql::update(self.descriptor, key, payload))?;
        self.execute("update", builder).await
    }

    /// Rows affected; zero when the key does not exist.
    pub async fn delete(&self, key: i64) -> Result<u64> {
        let builder = self.prepare("delete", sql::delete(self.descriptor, key))?;
        self.execute("delete", builder).await
    }

    /// Unbounded: unlike `read_all`, no limit is applied.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Record>> {
        let builder = self.prepare("search", sql::search(self.descriptor, criteria))?;
        self.fetch_records("search", builder).await
    }

    fn prepare(&self, operation: &'static str, built: Result<Builder>) -> Result<Builder> {
        match built {
            Ok(builder) => {
                debug!(
                    table = self.descriptor.table,
                    operation,
                    sql = builder.sql(),
                    "statement built"
                );
                Ok(builder)
            }
            Err(err) => {
                warn!(
                    table = self.descriptor.table,
                    operation,
                    error = %err,
                    "statement rejected before reaching the store"
                );
                Err(err)
            }
        }
    }

    async fn fetch_records(
        &self,
        operation: &'static str,
        mut builder: Builder,
    ) -> Result<Vec<Record>> {
        let started = Instant::now();
        let records = builder
            .build_query_scalar::<Json<Record>>()
            .fetch_all(self.pool)
            .await
            .map_err(|err| self.fail(operation, err))?;

        info!(
            table = self.descriptor.table,
            operation,
            rows = records.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "rows fetched"
        );
        Ok(records.into_iter().map(|Json(record)| record).collect())
    }

    async fn execute(&self, operation: &'static str, mut builder: Builder) -> Result<u64> {
        let done = builder
            .build()
            .execute(self.pool)
            .await
            .map_err(|err| self.fail(operation, err))?;

        let rows = done.rows_affected();
        info!(table = self.descriptor.table, operation, rows, "statement executed");
        Ok(rows)
    }

    fn fail(&self, operation: &'static str, err: sqlx::Error) -> Error {
        let err = map_db_error(err);
        warn!(
            table = self.descriptor.table,
            operation,
            error = %err,
            "store operation failed"
        );
        err
    }
}
