//! # bookshelf
//!
//! A REST catalog of books, authors and genres with user sessions, built on
//! Axum and Sea-ORM.
//!
//! Every collection endpoint accepts the same list language:
//!
//! ```text
//! GET /api/v1/books?year_of_publication=gte:1950&title=ilike:%25war%25&sort_by=title&page=2&size=10
//! ```
//!
//! * `page` / `size` select a window (defaults 1 and 50)
//! * `sort_by` / `sort_order` order by an allow-listed field
//! * any other parameter filters the field of the same name, written
//!   `<op>:<value>` with `op` in `eq, ne, lt, lte, gt, gte, like, ilike, in`
//!
//! Fields outside an entity's allow-list are rejected with 422 before the
//! database is queried.
//!
//! ## Layout
//!
//! - [`filtering`]: filter parsing, condition building, sorting and pagination
//! - [`core`]: the [`Resource`](core::Resource) allow-list trait and the
//!   existence / uniqueness / association guards
//! - [`crud`]: per-entity repositories running mutations in transactions
//! - [`routes`]: axum handlers and the OpenAPI document
//! - [`auth`]: argon2 password hashing, JWT sessions and the auth extractors

pub mod auth;
pub mod config;
pub mod core;
pub mod crud;
pub mod entities;
pub mod errors;
pub mod extract;
pub mod filtering;
pub mod migration;
pub mod models;
pub mod routes;
pub mod state;
pub mod validation;

pub use errors::{CatalogError, Result};
pub use state::AppState;
