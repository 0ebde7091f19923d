use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::Librarian;
use crate::crud::GenresCrud;
use crate::errors::{ErrorResponse, Result};
use crate::extract::{Path, QueryPairs, ValidJson};
use crate::filtering::{ListParams, ListQuery, Page};
use crate::models::{Book, Genre, GenreCreate, GenreUpdate};
use crate::state::AppState;

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_genres, create_genre))
        .routes(routes!(get_genre, update_genre, delete_genre))
        .routes(routes!(list_genre_books))
        .routes(routes!(add_genre_book, remove_genre_book))
}

/// List genres
///
/// Filterable and sortable: `name`, `description`, `created_at`,
/// `updated_at`. Newest first unless `sort_by` is given.
#[utoipa::path(
    get,
    path = "/api/v1/genres",
    tag = "genres",
    params(ListParams),
    responses(
        (status = StatusCode::OK, description = "A page of genres", body = Page<Genre>),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid filter, sort or page", body = ErrorResponse)
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<Page<Genre>>> {
    let query = ListQuery::from_pairs(pairs)?;
    let page = GenresCrud::new(&state.db).list(&query).await?;
    Ok(Json(page.map(Genre::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/genres/{genre_id}",
    tag = "genres",
    params(("genre_id" = i32, Path, description = "Genre id")),
    responses(
        (status = StatusCode::OK, description = "The requested genre", body = Genre),
        (status = StatusCode::NOT_FOUND, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(genre_id): Path<i32>,
) -> Result<Json<Genre>> {
    let genre = GenresCrud::new(&state.db).get(genre_id).await?;
    Ok(Json(genre.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/genres",
    tag = "genres",
    request_body = GenreCreate,
    security(("bearer" = [])),
    responses(
        (status = StatusCode::CREATED, description = "Genre created", body = Genre),
        (status = StatusCode::FORBIDDEN, description = "Not a librarian", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    _librarian: Librarian,
    ValidJson(payload): ValidJson<GenreCreate>,
) -> Result<(StatusCode, Json<Genre>)> {
    let genre = GenresCrud::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(genre.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/genres/{genre_id}",
    tag = "genres",
    params(("genre_id" = i32, Path, description = "Genre id")),
    request_body = GenreUpdate,
    security(("bearer" = [])),
    responses(
        (status = StatusCode::OK, description = "Genre updated", body = Genre),
        (status = StatusCode::NOT_FOUND, description = "Genre not found", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path(genre_id): Path<i32>,
    ValidJson(payload): ValidJson<GenreUpdate>,
) -> Result<Json<Genre>> {
    let genre = GenresCrud::new(&state.db).update(genre_id, payload).await?;
    Ok(Json(genre.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/genres/{genre_id}",
    tag = "genres",
    params(("genre_id" = i32, Path, description = "Genre id")),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Genre deleted with its associations"),
        (status = StatusCode::NOT_FOUND, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path(genre_id): Path<i32>,
) -> Result<StatusCode> {
    GenresCrud::new(&state.db).delete(genre_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the books filed under a genre
#[utoipa::path(
    get,
    path = "/api/v1/genres/{genre_id}/books",
    tag = "genres",
    params(("genre_id" = i32, Path, description = "Genre id"), ListParams),
    responses(
        (status = StatusCode::OK, description = "A page of books", body = Page<Book>),
        (status = StatusCode::NOT_FOUND, description = "Genre not found", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid filter, sort or page", body = ErrorResponse)
    )
)]
pub async fn list_genre_books(
    State(state): State<AppState>,
    Path(genre_id): Path<i32>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<Page<Book>>> {
    let query = ListQuery::from_pairs(pairs)?;
    let page = GenresCrud::new(&state.db)
        .list_books(genre_id, &query)
        .await?;
    Ok(Json(page.map(Book::from)))
}

#[utoipa::path(
    post,
    path = "/api/v1/genres/{genre_id}/books/{book_id}",
    tag = "genres",
    params(
        ("genre_id" = i32, Path, description = "Genre id"),
        ("book_id" = i32, Path, description = "Book id")
    ),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::CREATED, description = "Book linked to the genre"),
        (status = StatusCode::BAD_REQUEST, description = "Association already exists", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Genre or book not found", body = ErrorResponse)
    )
)]
pub async fn add_genre_book(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path((genre_id, book_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    GenresCrud::new(&state.db).add_book(genre_id, book_id).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/api/v1/genres/{genre_id}/books/{book_id}",
    tag = "genres",
    params(
        ("genre_id" = i32, Path, description = "Genre id"),
        ("book_id" = i32, Path, description = "Book id")
    ),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Book unlinked from the genre"),
        (status = StatusCode::NOT_FOUND, description = "Genre, book or association not found", body = ErrorResponse)
    )
)]
pub async fn remove_genre_book(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path((genre_id, book_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    GenresCrud::new(&state.db)
        .remove_book(genre_id, book_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
