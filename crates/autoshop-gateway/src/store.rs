use async_trait::async_trait;
use sqlx::PgPool;

use autoshop_core::{Entity, Op, Result, SearchCriteria};

use crate::gateway::Gateway;
use crate::rules::RecordLookup;

/// Shared handle to the database that hands out per-entity gateways.
///
/// The pool is expected to be capped at a single connection; every gateway
/// reuses it.
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn gateway(&self, entity: Entity) -> Gateway<'_> {
        Gateway::new(&self.pool, entity.descriptor())
    }
}

#[async_trait]
impl RecordLookup for Store {
    async fn exists(&self, entity: Entity, key: i64) -> Result<bool> {
        Ok(self.gateway(entity).read_by_pk(key).await?.is_some())
    }

    async fn is_referenced(&self, child: Entity, column: &str, key: i64) -> Result<bool> {
        let criteria = SearchCriteria::new(child).with(column, Op::Eq, key);
        Ok(!self.gateway(child).search(&criteria).await?.is_empty())
    }
}
