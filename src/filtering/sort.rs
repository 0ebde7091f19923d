use std::str::FromStr;

use sea_orm::{ColumnTrait, QueryOrder, sea_query::Order};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::errors::{CatalogError, Result};

/// Direction accepted in the `sort_order` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(CatalogError::validation(
                "Query parameter 'sort_order' must be 'asc' or 'desc'",
            )),
        }
    }
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Self::Asc,
            SortOrder::Desc => Self::Desc,
        }
    }
}

/// Resolve `sort_by`/`sort_order` against the sortable allow-list.
///
/// Returns `None` when no `sort_by` was given. A present `sort_by` without
/// `sort_order` sorts ascending.
///
/// # Errors
///
/// `Sorting by '<field>' is not allowed.` when `sort_by` is not in `allowed`,
/// or a validation error when `sort_order` is neither `asc` nor `desc`.
pub fn parse_sorting<C>(
    sort_by: Option<&str>,
    sort_order: Option<&str>,
    allowed: &[(&'static str, C)],
) -> Result<Option<(C, Order)>>
where
    C: ColumnTrait,
{
    let order = sort_order.map(SortOrder::from_str).transpose()?.unwrap_or_default();

    let Some(field) = sort_by else {
        return Ok(None);
    };

    allowed
        .iter()
        .find(|(name, _)| *name == field)
        .map(|&(_, column)| Some((column, order.into())))
        .ok_or_else(|| {
            tracing::debug!(field, "rejected sort outside allow-list");
            CatalogError::validation(format!("Sorting by '{field}' is not allowed."))
        })
}

/// Append a single ordering clause. The input is trusted; `None` leaves the
/// query unchanged.
pub fn apply_sorting<Q, C>(query: Q, sort: Option<(C, Order)>) -> Q
where
    Q: QueryOrder,
    C: ColumnTrait,
{
    match sort {
        Some((column, order)) => query.order_by(column, order),
        None => query,
    }
}
