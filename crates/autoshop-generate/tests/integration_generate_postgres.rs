#[path = "../../../fixtures/support/postgres.rs"]
mod support;

use anyhow::Result;
use autoshop_core::{Entity, Error};
use autoshop_generate::RandomDataGenerator;
use autoshop_introspect::PostgresCatalog;
use sqlx::PgPool;

use support::fresh_db;

fn generator(pool: &PgPool) -> RandomDataGenerator<PostgresCatalog> {
    RandomDataGenerator::new(pool.clone(), PostgresCatalog::new(pool.clone()))
}

async fn count(pool: &PgPool, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    Ok(sqlx::query_scalar(&sql).fetch_one(pool).await?)
}

#[tokio::test]
async fn generates_exactly_the_requested_rows() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let generator = generator(&db.pool);

    let report = generator.generate(Entity::Owner, 25).await?;
    assert!(report.succeeded());
    assert_eq!(report.table, "owner");
    assert_eq!(report.rows_inserted, 25);
    assert_eq!(count(&db.pool, "owner").await?, 25);

    let lengths: Vec<i32> =
        sqlx::query_scalar("SELECT DISTINCT LENGTH(firstname) FROM owner")
            .fetch_all(&db.pool)
            .await?;
    assert_eq!(lengths, vec![10]);
    Ok(())
}

#[tokio::test]
async fn generated_cars_reference_existing_owners() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let generator = generator(&db.pool);
    generator.generate(Entity::Owner, 5).await?;

    let report = generator.generate(Entity::Car, 40).await?;
    assert_eq!(report.rows_inserted, 40);

    let orphans: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM car c LEFT JOIN owner o ON o.ownerid = c.ownerid \
         WHERE o.ownerid IS NULL",
    )
    .fetch_one(&db.pool)
    .await?;
    assert_eq!(orphans, 0);

    let out_of_range: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM car WHERE year < 0 OR year >= 1000")
            .fetch_one(&db.pool)
            .await?;
    assert_eq!(out_of_range, 0);
    Ok(())
}

#[tokio::test]
async fn service_dates_stay_in_the_window() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let generator = generator(&db.pool);
    generator.generate(Entity::Owner, 2).await?;
    generator.generate(Entity::Car, 3).await?;
    generator.generate(Entity::ServiceRecord, 30).await?;

    let outside: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM servicerecord \
         WHERE servicedate < DATE '2024-01-01' OR servicedate > DATE '2024-12-31' \
            OR servicecost < 0 OR servicecost > 1000",
    )
    .fetch_one(&db.pool)
    .await?;
    assert_eq!(outside, 0);
    Ok(())
}

#[tokio::test]
async fn empty_reference_commits_nothing() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let generator = generator(&db.pool);
    generator.generate(Entity::Mechanic, 3).await?;

    let result = generator.generate(Entity::ServiceMechanic, 10).await;
    assert!(matches!(result, Err(Error::EmptyReference(table)) if table == "servicerecord"));
    assert_eq!(count(&db.pool, "servicemechanic").await?, 0);

    let result = generator.generate(Entity::Car, 10).await;
    assert!(matches!(result, Err(Error::EmptyReference(table)) if table == "owner"));
    assert_eq!(count(&db.pool, "car").await?, 0);
    Ok(())
}

#[tokio::test]
async fn failing_row_rolls_back_the_batch() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    // The fourth row trips the check after three have already gone in.
    sqlx::query("ALTER TABLE owner ADD CONSTRAINT owner_rows_guard CHECK (ownerid < 4)")
        .execute(&db.pool)
        .await?;

    let result = generator(&db.pool).generate(Entity::Owner, 10).await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));
    assert_eq!(count(&db.pool, "owner").await?, 0);
    Ok(())
}

#[tokio::test]
async fn zero_rows_is_a_successful_no_op() -> Result<()> {
    let Some(db) = fresh_db().await? else {
        return Ok(());
    };
    let report = generator(&db.pool).generate(Entity::ServiceMechanic, 0).await?;
    assert!(report.succeeded());
    assert_eq!(report.rows_inserted, 0);
    Ok(())
}
