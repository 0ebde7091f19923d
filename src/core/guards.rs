//! Read-only precondition checks composed by the repositories.
//!
//! None of these functions write. `ensure_unique` and
//! `ensure_association_absent` are check-then-act: the database constraints
//! remain the backstop when two writers race past the same check.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PrimaryKeyTrait, QueryFilter, Value,
};

use crate::core::Resource;
use crate::errors::{CatalogError, Result};

pub const ASSOCIATION_EXISTS: &str = "Association already exists";
pub const ASSOCIATION_NOT_FOUND: &str = "Association not found";

/// Load a record by primary key or fail with `"<Entity> not found"`.
pub async fn fetch_by_id<E, C>(db: &C, id: i32) -> Result<E::Model>
where
    E: Resource,
    C: ConnectionTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CatalogError::not_found(E::not_found_message()))
}

/// Fail with `message` as a conflict when any row already holds `value` in
/// `column`.
pub async fn ensure_unique<E, C, V>(db: &C, column: E::Column, value: V, message: &str) -> Result<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
    V: Into<Value>,
{
    let existing = E::find().filter(column.eq(value)).one(db).await?;
    if existing.is_some() {
        tracing::debug!(entity = %E::default().table_name(), message, "uniqueness check failed");
        return Err(CatalogError::conflict(message));
    }
    Ok(())
}

/// Fail with `"Association already exists"` when a join row with these keys
/// is present.
pub async fn ensure_association_absent<E, C>(db: &C, keys: &[(E::Column, i32)]) -> Result<()>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if find_association::<E, C>(db, keys).await?.is_some() {
        return Err(CatalogError::conflict(ASSOCIATION_EXISTS));
    }
    Ok(())
}

/// Load the join row with these keys or fail with `"Association not found"`.
pub async fn fetch_association<E, C>(db: &C, keys: &[(E::Column, i32)]) -> Result<E::Model>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    find_association::<E, C>(db, keys)
        .await?
        .ok_or_else(|| CatalogError::not_found(ASSOCIATION_NOT_FOUND))
}

async fn find_association<E, C>(db: &C, keys: &[(E::Column, i32)]) -> Result<Option<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let condition = keys
        .iter()
        .fold(Condition::all(), |condition, (column, id)| condition.add(column.eq(*id)));
    Ok(E::find().filter(condition).one(db).await?)
}
