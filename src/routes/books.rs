use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::Librarian;
use crate::crud::BooksCrud;
use crate::errors::{ErrorResponse, Result};
use crate::extract::{Path, QueryPairs, ValidJson};
use crate::filtering::{ListParams, ListQuery, Page};
use crate::models::{Author, Book, BookCreate, BookUpdate, Genre};
use crate::state::AppState;

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_books, create_book))
        .routes(routes!(get_book, update_book, delete_book))
        .routes(routes!(list_book_authors))
        .routes(routes!(add_book_author, remove_book_author))
        .routes(routes!(list_book_genres))
        .routes(routes!(add_book_genre, remove_book_genre))
}

/// List books
///
/// Filterable: `title`, `description`, `year_of_publication`, `isbn`,
/// `series`, `edition`, `created_at`, `updated_at`.
/// Sortable: the same fields plus `file_link`.
#[utoipa::path(
    get,
    path = "/api/v1/books",
    tag = "books",
    params(ListParams),
    responses(
        (status = StatusCode::OK, description = "A page of books", body = Page<Book>),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid filter, sort or page", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<Page<Book>>> {
    let query = ListQuery::from_pairs(pairs)?;
    let page = BooksCrud::new(&state.db).list(&query).await?;
    Ok(Json(page.map(Book::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/books/{book_id}",
    tag = "books",
    params(("book_id" = i32, Path, description = "Book id")),
    responses(
        (status = StatusCode::OK, description = "The requested book", body = Book),
        (status = StatusCode::NOT_FOUND, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
) -> Result<Json<Book>> {
    let book = BooksCrud::new(&state.db).get(book_id).await?;
    Ok(Json(book.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/books",
    tag = "books",
    request_body = BookCreate,
    security(("bearer" = [])),
    responses(
        (status = StatusCode::CREATED, description = "Book created", body = Book),
        (status = StatusCode::BAD_REQUEST, description = "ISBN already taken", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Not a librarian", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    _librarian: Librarian,
    ValidJson(payload): ValidJson<BookCreate>,
) -> Result<(StatusCode, Json<Book>)> {
    let book = BooksCrud::new(&state.db).create(payload).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/books/{book_id}",
    tag = "books",
    params(("book_id" = i32, Path, description = "Book id")),
    request_body = BookUpdate,
    security(("bearer" = [])),
    responses(
        (status = StatusCode::OK, description = "Book updated", body = Book),
        (status = StatusCode::BAD_REQUEST, description = "ISBN already taken", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Book not found", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path(book_id): Path<i32>,
    ValidJson(payload): ValidJson<BookUpdate>,
) -> Result<Json<Book>> {
    let book = BooksCrud::new(&state.db).update(book_id, payload).await?;
    Ok(Json(book.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/books/{book_id}",
    tag = "books",
    params(("book_id" = i32, Path, description = "Book id")),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Book deleted with its associations"),
        (status = StatusCode::NOT_FOUND, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path(book_id): Path<i32>,
) -> Result<StatusCode> {
    BooksCrud::new(&state.db).delete(book_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the authors of a book
#[utoipa::path(
    get,
    path = "/api/v1/books/{book_id}/authors",
    tag = "books",
    params(("book_id" = i32, Path, description = "Book id"), ListParams),
    responses(
        (status = StatusCode::OK, description = "A page of authors", body = Page<Author>),
        (status = StatusCode::NOT_FOUND, description = "Book not found", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid filter, sort or page", body = ErrorResponse)
    )
)]
pub async fn list_book_authors(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<Page<Author>>> {
    let query = ListQuery::from_pairs(pairs)?;
    let page = BooksCrud::new(&state.db)
        .list_authors(book_id, &query)
        .await?;
    Ok(Json(page.map(Author::from)))
}

#[utoipa::path(
    post,
    path = "/api/v1/books/{book_id}/authors/{author_id}",
    tag = "books",
    params(
        ("book_id" = i32, Path, description = "Book id"),
        ("author_id" = i32, Path, description = "Author id")
    ),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::CREATED, description = "Author linked to the book"),
        (status = StatusCode::BAD_REQUEST, description = "Association already exists", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Book or author not found", body = ErrorResponse)
    )
)]
pub async fn add_book_author(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path((book_id, author_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    BooksCrud::new(&state.db)
        .add_author(book_id, author_id)
        .await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/api/v1/books/{book_id}/authors/{author_id}",
    tag = "books",
    params(
        ("book_id" = i32, Path, description = "Book id"),
        ("author_id" = i32, Path, description = "Author id")
    ),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Author unlinked from the book"),
        (status = StatusCode::NOT_FOUND, description = "Book, author or association not found", body = ErrorResponse)
    )
)]
pub async fn remove_book_author(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path((book_id, author_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    BooksCrud::new(&state.db)
        .remove_author(book_id, author_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the genres of a book
#[utoipa::path(
    get,
    path = "/api/v1/books/{book_id}/genres",
    tag = "books",
    params(("book_id" = i32, Path, description = "Book id"), ListParams),
    responses(
        (status = StatusCode::OK, description = "A page of genres", body = Page<Genre>),
        (status = StatusCode::NOT_FOUND, description = "Book not found", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid filter, sort or page", body = ErrorResponse)
    )
)]
pub async fn list_book_genres(
    State(state): State<AppState>,
    Path(book_id): Path<i32>,
    QueryPairs(pairs): QueryPairs,
) -> Result<Json<Page<Genre>>> {
    let query = ListQuery::from_pairs(pairs)?;
    let page = BooksCrud::new(&state.db)
        .list_genres(book_id, &query)
        .await?;
    Ok(Json(page.map(Genre::from)))
}

#[utoipa::path(
    post,
    path = "/api/v1/books/{book_id}/genres/{genre_id}",
    tag = "books",
    params(
        ("book_id" = i32, Path, description = "Book id"),
        ("genre_id" = i32, Path, description = "Genre id")
    ),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::CREATED, description = "Genre linked to the book"),
        (status = StatusCode::BAD_REQUEST, description = "Association already exists", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Book or genre not found", body = ErrorResponse)
    )
)]
pub async fn add_book_genre(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path((book_id, genre_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    BooksCrud::new(&state.db).add_genre(book_id, genre_id).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/api/v1/books/{book_id}/genres/{genre_id}",
    tag = "books",
    params(
        ("book_id" = i32, Path, description = "Book id"),
        ("genre_id" = i32, Path, description = "Genre id")
    ),
    security(("bearer" = [])),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Genre unlinked from the book"),
        (status = StatusCode::NOT_FOUND, description = "Book, genre or association not found", body = ErrorResponse)
    )
)]
pub async fn remove_book_genre(
    State(state): State<AppState>,
    _librarian: Librarian,
    Path((book_id, genre_id)): Path<(i32, i32)>,
) -> Result<StatusCode> {
    BooksCrud::new(&state.db)
        .remove_genre(book_id, genre_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
