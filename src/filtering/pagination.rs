use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, QuerySelect, Select};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::Result;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// Largest offset the database accepts.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Validated window of a list request. Both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u64,
    pub size: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size
    }

    /// Number of pages needed for `total` rows.
    #[must_use]
    pub const fn pages(&self, total: u64) -> u64 {
        total.div_ceil(self.size)
    }
}

/// Paginated envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Rows matching the filters, ignoring the window
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, params: &PaginationParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            size: params.size,
            pages: params.pages(total),
        }
    }

    /// Convert every item, keeping the counters.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
            pages: self.pages,
        }
    }
}

/// Run `select` twice: once counting every matching row and once windowed.
///
/// A page past the end yields no items while `total` and `pages` still
/// describe the full result set. A window starting beyond `MAX_OFFSET` is
/// never sent to the database.
pub async fn paginate<C, E, M>(
    db: &C,
    select: Select<E>,
    params: &PaginationParams,
) -> Result<Page<M>>
where
    C: ConnectionTrait,
    E: EntityTrait<Model = M>,
    M: FromQueryResult + Sized + Send + Sync,
{
    let total = select.clone().count(db).await?;
    if params.offset() > MAX_OFFSET {
        return Ok(Page::new(Vec::new(), total, params));
    }
    let items = select
        .offset(params.offset())
        .limit(params.limit())
        .all(db)
        .await?;

    Ok(Page::new(items, total, params))
}
