use sea_orm::sea_query::Order;
use utoipa::IntoParams;

use super::{pagination::PaginationParams, sort::parse_sorting, sort::SortOrder};
use crate::core::Resource;
use crate::errors::{CatalogError, Result};

/// Reserved list parameters, for the OpenAPI document.
///
/// Any other query parameter is read as a filter on the field of the same
/// name, written `<op>:<value>` with `op` one of `eq, ne, lt, lte, gt, gte,
/// like, ilike, in` (`eq` when omitted).
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number, starting at 1
    #[param(minimum = 1, default = 1)]
    pub page: Option<u64>,
    /// Items per page
    #[param(minimum = 1, default = 50)]
    pub size: Option<u64>,
    /// Allow-listed field to sort by
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`
    pub sort_order: Option<SortOrder>,
}

/// A list request resolved against one entity's allow-lists.
#[derive(Debug)]
pub struct ListQuery<E: Resource> {
    pub pagination: PaginationParams,
    pub sort: Option<(E::Column, Order)>,
    /// Filters in query-string order; field names are checked when applied
    pub filters: Vec<(String, String)>,
}

impl<E: Resource> Default for ListQuery<E> {
    fn default() -> Self {
        Self {
            pagination: PaginationParams::default(),
            sort: None,
            filters: Vec::new(),
        }
    }
}

/// Largest `page` or `size` the database can bind.
pub const MAX_QUERY_INTEGER: u64 = i64::MAX as u64;

fn positive(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|value| (1..=MAX_QUERY_INTEGER).contains(value))
        .ok_or_else(|| {
            CatalogError::validation(format!(
                "Query parameter '{name}' must be a positive integer"
            ))
        })
}

impl<E: Resource> ListQuery<E> {
    /// Split raw query pairs into pagination, sorting and filters.
    ///
    /// The last occurrence of a reserved parameter wins. Filters keep their
    /// order and may repeat a field, in which case both predicates apply.
    ///
    /// # Errors
    ///
    /// Validation errors for a `page`/`size` below 1 or not a number, and for
    /// a `sort_by`/`sort_order` rejected by [`parse_sorting`].
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self> {
        let mut pagination = PaginationParams::default();
        let mut sort_by = None;
        let mut sort_order = None;
        let mut filters = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "page" => pagination.page = positive("page", &value)?,
                "size" => pagination.size = positive("size", &value)?,
                "sort_by" => sort_by = Some(value),
                "sort_order" => sort_order = Some(value),
                _ => filters.push((key, value)),
            }
        }

        let sort = parse_sorting(
            sort_by.as_deref(),
            sort_order.as_deref(),
            &E::sortable_columns(),
        )?;

        Ok(Self {
            pagination,
            sort,
            filters,
        })
    }

    /// The requested ordering, or the entity's fallback.
    pub fn sort_or_default(&self) -> (E::Column, Order) {
        self.sort.clone().unwrap_or_else(E::default_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{book, genre};

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_reserved_keys_are_split_from_filters() {
        let query = ListQuery::<book::Entity>::from_pairs(pairs(&[
            ("page", "2"),
            ("title", "ilike:%dune%"),
            ("size", "10"),
            ("sort_by", "title"),
            ("year_of_publication", "gte:1950"),
        ]))
        .unwrap();

        assert_eq!(query.pagination, PaginationParams { page: 2, size: 10 });
        assert!(query.sort.is_some());
        assert_eq!(
            query.filters,
            pairs(&[("title", "ilike:%dune%"), ("year_of_publication", "gte:1950")])
        );
    }

    #[test]
    fn test_defaults() {
        let query = ListQuery::<book::Entity>::from_pairs(Vec::new()).unwrap();
        assert_eq!(query.pagination, PaginationParams::default());
        assert!(query.sort.is_none());
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_page_and_size_must_be_positive() {
        for (key, value) in [
            ("page", "0"),
            ("size", "0"),
            ("page", "-1"),
            ("size", "many"),
            ("page", "9223372036854775808"),
            ("size", "18446744073709551615"),
        ] {
            let err = ListQuery::<book::Entity>::from_pairs(pairs(&[(key, value)])).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Query parameter '{key}' must be a positive integer")
            );
        }
    }

    #[test]
    fn test_largest_bindable_page() {
        let query = ListQuery::<book::Entity>::from_pairs(pairs(&[(
            "page",
            "9223372036854775807",
        )]))
        .unwrap();
        assert_eq!(query.pagination.page, MAX_QUERY_INTEGER);
    }

    #[test]
    fn test_sort_is_checked_at_the_boundary() {
        let err =
            ListQuery::<genre::Entity>::from_pairs(pairs(&[("sort_by", "id")])).unwrap_err();
        assert_eq!(err.to_string(), "Sorting by 'id' is not allowed.");
    }

    #[test]
    fn test_fallback_order() {
        let query = ListQuery::<genre::Entity>::default();
        let (_, order) = query.sort_or_default();
        assert_eq!(order, Order::Desc);
    }
}
