use tracing::info;

use autoshop_core::{Entity, Error, Result};

use crate::rules::RecordLookup;

/// A parent row that must not be deleted while child rows point at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteGuard {
    pub parent: Entity,
    pub child: Entity,
    pub column: &'static str,
    pub message: &'static str,
}

/// Only Owner -> Car is guarded; other parents rely on the store's FK checks.
pub const DELETE_GUARDS: &[DeleteGuard] = &[DeleteGuard {
    parent: Entity::Owner,
    child: Entity::Car,
    column: "ownerid",
    message: "Cannot delete Owner with associated Cars.",
}];

/// Refuse to delete `key` of `entity` when a guarded child still references it.
pub async fn ensure_deletable<L>(lookup: &L, entity: Entity, key: i64) -> Result<()>
where
    L: RecordLookup + Sync + ?Sized,
{
    for guard in DELETE_GUARDS.iter().filter(|guard| guard.parent == entity) {
        if lookup.is_referenced(guard.child, guard.column, key).await? {
            info!(
                event = "delete_refused",
                table = entity.descriptor().table,
                key,
                child = guard.child.descriptor().table,
                "delete refused"
            );
            return Err(Error::Referenced(guard.message.to_string()));
        }
    }
    Ok(())
}
