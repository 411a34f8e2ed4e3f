//! Postgres harness shared by the store-backed integration tests.
//!
//! The schema fixture drops and recreates the application tables, so only a
//! dedicated `TEST_DATABASE_URL` enables these tests. `DATABASE_URL` is the
//! application's own database and is never read here.

use std::sync::OnceLock;
use std::{env, fs};

use anyhow::{Context, Result};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::sync::{Mutex, MutexGuard};

pub const TEST_DATABASE_ENV: &str = "TEST_DATABASE_URL";

const SCHEMA_FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../fixtures/sql/postgres/001_schema.sql"
);

/// A fresh schema plus the guard that keeps other tests in this binary off it.
pub struct TestDb {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

fn lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

pub fn test_database_url<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(TEST_DATABASE_ENV).filter(|url| !url.trim().is_empty())
}

/// `Ok(None)` when no test database is configured, so the caller skips.
pub async fn fresh_db() -> Result<Option<TestDb>> {
    let Some(url) = test_database_url(|name| env::var(name).ok()) else {
        eprintln!("skipping: set {TEST_DATABASE_ENV} to run Postgres-backed tests");
        return Ok(None);
    };

    let guard = lock().lock().await;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(&url)
        .await
        .context("connecting to Postgres")?;

    let script = fs::read_to_string(SCHEMA_FIXTURE)
        .with_context(|| format!("reading fixture {SCHEMA_FIXTURE}"))?;
    for statement in script.split(';') {
        let sql = statement.trim();
        if sql.is_empty() {
            continue;
        }
        sqlx::query(sql)
            .execute(&pool)
            .await
            .with_context(|| format!("executing fixture statement: {sql}"))?;
    }

    Ok(Some(TestDb {
        pool,
        _guard: guard,
    }))
}

#[test]
fn application_database_url_never_enables_fixture_tests() {
    let only_app_db = |name: &str| match name {
        "DATABASE_URL" => Some("postgres://app@prod/garage".to_string()),
        _ => None,
    };
    assert_eq!(test_database_url(only_app_db), None);

    let blank = |name: &str| (name == TEST_DATABASE_ENV).then(|| "  ".to_string());
    assert_eq!(test_database_url(blank), None);

    let both = |name: &str| match name {
        "DATABASE_URL" => Some("postgres://app@prod/garage".to_string()),
        TEST_DATABASE_ENV => Some("postgres://tester@localhost/scratch".to_string()),
        _ => None,
    };
    assert_eq!(
        test_database_url(both).as_deref(),
        Some("postgres://tester@localhost/scratch")
    );
}
