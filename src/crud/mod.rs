//! Entity repositories.
//!
//! Each repository borrows a connection (or transaction) for the lifetime of
//! one request. Reads run on that handle directly; every mutation opens a
//! transaction, composes the guards from [`crate::core::guards`], writes, and
//! commits. An early return drops the transaction, which rolls it back.

pub mod authors;
pub mod books;
pub mod genres;
pub mod users;

pub use authors::AuthorsCrud;
pub use books::BooksCrud;
pub use genres::GenresCrud;
pub use users::UsersCrud;

use sea_orm::{ConnectionTrait, Iterable, PrimaryKeyToColumn, QueryOrder, Select};

use crate::core::Resource;
use crate::errors::Result;
use crate::filtering::{ListQuery, Page, apply_filters, apply_sorting, paginate};

/// Apply the filters and ordering of `query` without touching the database.
///
/// A requested `sort_by` is the only sort key. The default listing is
/// tie-broken by primary key.
fn prepare<E, C>(db: &C, select: Select<E>, query: &ListQuery<E>) -> Result<Select<E>>
where
    E: Resource,
    C: ConnectionTrait,
{
    let select = apply_filters(
        select,
        &query.filters,
        &E::filterable_columns(),
        db.get_database_backend(),
    )?;
    let select = apply_sorting(select, Some(query.sort_or_default()));
    if query.sort.is_some() {
        return Ok(select);
    }
    Ok(E::PrimaryKey::iter().fold(select, |select, key| select.order_by_asc(key.into_column())))
}

async fn fetch_page<E, C>(db: &C, select: Select<E>, query: &ListQuery<E>) -> Result<Page<E::Model>>
where
    E: Resource,
    E::Model: Sync,
    C: ConnectionTrait,
{
    paginate(db, select, &query.pagination).await
}
