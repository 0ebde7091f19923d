use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::Librarian;
use crate::crud::AuthorsCrud;
use crate::errors::{ErrorResponse, Result};
use crate::extract::{Path, QueryPairs, ValidJson};
use crate::filtering::{ListParams, ListQuery, Page};
use crate::models::{Author, AuthorCreate, AuthorUpdate, Book};
use crate::state::AppState;

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_authors, create_author))
        .routes(routes!(get_author, update_author, delete_author))
        .routes(routes!(list_author_books))
        .routes(routes!(add_author_book, remove_author_book))
}

/// List authors
///
/// Filterable: `name`, `surname`, `year_of_birth`, `created_at`,
/// `updated_at`. Sortable: the same fields plus `biography`.
#[utoipa::path(
    get,
    path = "/api/v1/authors",
    tag = "authors",
    params(ListParams),
    responses(
        (status = StatusCode::OK, description = "A page of authors", body = Page<Author>),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid filter, sort or page", body = ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<Page<Author>>> {
    let query = ListQuery::from_pairs(pairs)?;
    let page = AuthorsCrud::new(&state.db).list(&query).await?;
    Ok(Json(page.map(Author::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/authors/{author_id}",
    tag = "authors",
    params(("author_id" = i32, Path, description = "Author id")),
    responses(
        (status = StatusCode::OK, description = "The requested author", body = Author),
        (status = StatusCode::NOT_FOUND, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(author_id): Path<i32>,
) -> Result<Json<Author>> {
    let author = AuthorsCrud::new(&state.db).get(author_id).await?;
    Ok(Json(author.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/authors",
    tag = "authors",
    request_body = AuthorCreate,
    security(("bearer" = [])),
    responses(
        (status = StatusCode::CREATED, description = "Author created", body = Author),
        (status = StatusCode::FORBIDDEN, description = "Not a librarian", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    _librarian: Librarian,
    ValidJson(payload): ValidJson<AuthorCreate>,
) -> Result<(StatusCode, Json<Author>)> {
    let author = AuthorsCrud::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(author.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/authors/{author_id}",
    tag = "authors",
    params(("author_id" = i32, Path, description = "Author id")),
    request_body = AuthorUpdate,
    security(("bearer" = [])),
    responses(
        (status = StatusCode::OK, description = "Author updated", body = Author),
        (status = StatusCode::NOT_FOUND, description = "Author not found", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path(author_id): Path<i32>,
    ValidJson(payload): ValidJson<AuthorUpdate>,
) -> Result<Json<Author>> {
    let author = AuthorsCrud::new(&state.db)
        .update(author_id, payload)
        .await?;
    Ok(Json(author.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/authors/{author_id}",
    tag = "authors",
    params(("author_id" = i32, Path, description = "Author id")),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Author deleted with its associations"),
        (status = StatusCode::NOT_FOUND, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path(author_id): Path<i32>,
) -> Result<StatusCode> {
    AuthorsCrud::new(&state.db).delete(author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the books written by an author
#[utoipa::path(
    get,
    path = "/api/v1/authors/{author_id}/books",
    tag = "authors",
    params(("author_id" = i32, Path, description = "Author id"), ListParams),
    responses(
        (status = StatusCode::OK, description = "A page of books", body = Page<Book>),
        (status = StatusCode::NOT_FOUND, description = "Author not found", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid filter, sort or page", body = ErrorResponse)
    )
)]
pub async fn list_author_books(
    State(state): State<AppState>,
    Path(author_id): Path<i32>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<Page<Book>>> {
    let query = ListQuery::from_pairs(pairs)?;
    let page = AuthorsCrud::new(&state.db)
        .list_books(author_id, &query)
        .await?;
    Ok(Json(page.map(Book::from)))
}

#[utoipa::path(
    post,
    path = "/api/v1/authors/{author_id}/books/{book_id}",
    tag = "authors",
    params(
        ("author_id" = i32, Path, description = "Author id"),
        ("book_id" = i32, Path, description = "Book id")
    ),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::CREATED, description = "Book linked to the author"),
        (status = StatusCode::BAD_REQUEST, description = "Association already exists", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Author or book not found", body = ErrorResponse)
    )
)]
pub async fn add_author_book(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path((author_id, book_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    AuthorsCrud::new(&state.db)
        .add_book(author_id, book_id)
        .await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/api/v1/authors/{author_id}/books/{book_id}",
    tag = "authors",
    params(
        ("author_id" = i32, Path, description = "Author id"),
        ("book_id" = i32, Path, description = "Book id")
    ),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Book unlinked from the author"),
        (status = StatusCode::NOT_FOUND, description = "Author, book or association not found", body = ErrorResponse)
    )
)]
pub async fn remove_author_book(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path((author_id, book_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    AuthorsCrud::new(&state.db)
        .remove_book(author_id, book_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
