//! Operator flows on top of the gateway, rules and generator.

use std::io::Write;
use std::time::Instant;

use sqlx::PgPool;
use tracing::info;

use autoshop_core::{Entity, Payload, Record, SearchCriteria};
use autoshop_gateway::{Created, Store, ensure_deletable, validate};
use autoshop_generate::RandomDataGenerator;
use autoshop_introspect::{Catalog, PostgresCatalog};

use crate::CliError;

pub struct Session {
    store: Store,
    catalog: PostgresCatalog,
    generator: RandomDataGenerator<PostgresCatalog>,
}

impl Session {
    pub fn new(pool: PgPool) -> Self {
        let catalog = PostgresCatalog::new(pool.clone());
        Self {
            store: Store::new(pool.clone()),
            catalog: catalog.clone(),
            generator: RandomDataGenerator::new(pool, catalog),
        }
    }

    pub async fn close(&self) {
        self.store.pool().close().await;
    }

    pub async fn create<W: Write>(
        &self,
        out: &mut W,
        entity: Entity,
        assignments: &[String],
    ) -> Result<(), CliError> {
        let descriptor = entity.descriptor();
        let payload = Payload::parse(descriptor, assignments)?;
        validate(descriptor, &payload, &self.store)
            .await?
            .into_result()?;

        let created = self
            .store
            .gateway(entity)
            .create(&payload)
            .await
            .map_err(|err| CliError::failed(format!("Failed to add {entity}."), err))?;

        match created {
            Created::Key(key) => writeln!(out, "{entity} added successfully with ID {key}.")?,
            Created::Rows(_) => writeln!(out, "{entity} added successfully.")?,
        }
        Ok(())
    }

    pub async fn list<W: Write>(&self, out: &mut W, entity: Entity) -> Result<(), CliError> {
        let records = self.store.gateway(entity).read_all().await?;
        print_records(out, &records)
    }

    pub async fn show<W: Write>(
        &self,
        out: &mut W,
        entity: Entity,
        key: i64,
    ) -> Result<(), CliError> {
        let record = self
            .store
            .gateway(entity)
            .read_by_pk(key)
            .await?
            .ok_or_else(|| not_found(entity))?;
        print_records(out, std::slice::from_ref(&record))
    }

    /// The row must exist before anything is parsed or validated.
    pub async fn update<W: Write>(
        &self,
        out: &mut W,
        entity: Entity,
        key: i64,
        assignments: &[String],
    ) -> Result<(), CliError> {
        let gateway = self.store.gateway(entity);
        if gateway.read_by_pk(key).await?.is_none() {
            return Err(not_found(entity));
        }

        let descriptor = entity.descriptor();
        let payload = Payload::parse(descriptor, assignments)?;
        if payload.is_empty() {
            return Err(CliError::NoUpdates);
        }
        validate(descriptor, &payload, &self.store)
            .await?
            .into_result()?;

        let rows = gateway
            .update(key, &payload)
            .await
            .map_err(|err| CliError::failed(format!("Failed to update {entity}."), err))?;
        if rows == 0 {
            return Err(not_found(entity));
        }
        writeln!(out, "{entity} updated successfully.")?;
        Ok(())
    }

    pub async fn delete<W: Write>(
        &self,
        out: &mut W,
        entity: Entity,
        key: i64,
    ) -> Result<(), CliError> {
        ensure_deletable(&self.store, entity, key).await?;

        let rows = self
            .store
            .gateway(entity)
            .delete(key)
            .await
            .map_err(|err| CliError::failed(format!("Failed to delete {entity}."), err))?;
        if rows == 0 {
            return Err(not_found(entity));
        }
        writeln!(out, "{entity} deleted successfully.")?;
        Ok(())
    }

    pub async fn generate<W: Write>(
        &self,
        out: &mut W,
        entity: Entity,
        count: u64,
    ) -> Result<(), CliError> {
        let started = Instant::now();
        let report = self.generator.generate(entity, count).await.map_err(|err| {
            CliError::failed(format!("Failed to generate random data for {entity}."), err)
        })?;

        writeln!(
            out,
            "Generated {} random records for {entity} in {:.2} ms.",
            report.rows_inserted,
            elapsed_ms(started)
        )?;
        Ok(())
    }

    pub async fn search<W: Write>(
        &self,
        out: &mut W,
        criteria: &SearchCriteria,
    ) -> Result<(), CliError> {
        let started = Instant::now();
        let records = self
            .store
            .gateway(criteria.entity)
            .search(criteria)
            .await
            .map_err(|err| CliError::failed("Error executing search:", err))?;
        let duration_ms = elapsed_ms(started);

        info!(
            event = "search_finished",
            table = criteria.entity.descriptor().table,
            rows = records.len(),
            duration_ms
        );
        print_records(out, &records)?;
        writeln!(out, "Query executed in {duration_ms:.2} ms.")?;
        Ok(())
    }

    pub async fn describe<W: Write>(&self, out: &mut W, entity: Entity) -> Result<(), CliError> {
        let descriptor = entity.descriptor();
        let columns: Vec<&str> = descriptor.column_names().collect();
        let described = self
            .catalog
            .describe_columns(descriptor.table, &columns)
            .await?;
        for column in described {
            writeln!(out, "{}", serde_json::to_string(&column).map_err(io_error)?)?;
        }
        Ok(())
    }
}

fn not_found(entity: Entity) -> CliError {
    CliError::NotFound(format!("{entity} not found."))
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

fn io_error(err: serde_json::Error) -> std::io::Error {
    std::io::Error::other(err)
}

/// One JSON object per line, or a notice when there is nothing to show.
pub fn print_records<W: Write>(out: &mut W, records: &[Record]) -> Result<(), CliError> {
    if records.is_empty() {
        writeln!(out, "No records found.")?;
        return Ok(());
    }
    for record in records {
        writeln!(out, "{}", serde_json::to_string(record).map_err(io_error)?)?;
    }
    Ok(())
}
