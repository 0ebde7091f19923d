//! # Filtering, sorting and pagination for list endpoints
//!
//! List endpoints accept `page`, `size`, `sort_by` and `sort_order`; every
//! other query parameter is a filter on the field of the same name:
//!
//! ```text
//! GET /api/v1/books?year_of_publication=gte:1950&title=ilike:%25war%25
//! GET /api/v1/authors?surname=in:Herbert,Asimov&sort_by=year_of_birth&sort_order=desc
//! GET /api/v1/genres?created_at=lt:2023-01-01T00:00:00&page=2&size=10
//! ```
//!
//! Field names for both filtering and sorting are checked against the
//! entity's [`Resource`](crate::core::Resource) allow-lists before anything
//! reaches the query builder. Values are bound as parameters, coerced to the
//! column type.

pub mod conditions;
pub mod pagination;
pub mod query;
pub mod sort;

pub use conditions::{FilterOperator, apply_filters, build_condition, parse_filter};
pub use pagination::{Page, PaginationParams, paginate};
pub use query::{ListParams, ListQuery};
pub use sort::{SortOrder, apply_sorting, parse_sorting};
