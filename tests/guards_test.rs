mod common;

use bookshelf::{
    CatalogError,
    core::{ensure_association_absent, ensure_unique, fetch_association, fetch_by_id},
    crud::{AuthorsCrud, BooksCrud, books::ISBN_TAKEN},
    entities::{book, book_author},
    models::{AuthorCreate, BookCreate, BookUpdate},
};
use common::setup_test_db;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};

fn dune() -> BookCreate {
    BookCreate {
        title: "Dune".into(),
        description: None,
        year_of_publication: 1965,
        isbn: "9780441172719".into(),
        series: None,
        file_link: None,
        edition: None,
    }
}

#[tokio::test]
async fn test_fetch_by_id() {
    let db = setup_test_db().await;
    let created = BooksCrud::new(&db).create(dune()).await.unwrap();

    let fetched = fetch_by_id::<book::Entity, _>(&db, created.id).await.unwrap();
    assert_eq!(fetched, created);

    let err = fetch_by_id::<book::Entity, _>(&db, created.id + 1)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(ref message) if message == "Book not found"));
}

#[tokio::test]
async fn test_uniqueness_round_trip() {
    let db = setup_test_db().await;
    let books = BooksCrud::new(&db);

    ensure_unique::<book::Entity, _, _>(&db, book::Column::Isbn, "9780441172719", ISBN_TAKEN)
        .await
        .unwrap();
    let created = books.create(dune()).await.unwrap();

    let err = ensure_unique::<book::Entity, _, _>(&db, book::Column::Isbn, "9780441172719", ISBN_TAKEN)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(ref message) if message == ISBN_TAKEN));

    let err = books.create(dune()).await.unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));

    // Once the ISBN moves, the old value is free again
    books
        .update(
            created.id,
            BookUpdate {
                isbn: Some("9780593098233".into()),
                ..BookUpdate::default()
            },
        )
        .await
        .unwrap();
    books.create(dune()).await.unwrap();
}

#[tokio::test]
async fn test_lost_race_maps_to_conflict() {
    let db = setup_test_db().await;
    BooksCrud::new(&db).create(dune()).await.unwrap();

    // Skip the guard and let the unique index reject the write
    let err = book::ActiveModel {
        id: NotSet,
        title: Set("Dune (copy)".into()),
        description: Set(String::new()),
        year_of_publication: Set(1965),
        isbn: Set("9780441172719".into()),
        series: Set(String::new()),
        file_link: Set(String::new()),
        edition: Set(String::new()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&db)
    .await
    .map_err(|err| CatalogError::from_write(err, ISBN_TAKEN))
    .unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(ref message) if message == ISBN_TAKEN));
}

#[tokio::test]
async fn test_association_guards() {
    let db = setup_test_db().await;
    let book = BooksCrud::new(&db).create(dune()).await.unwrap();
    let authors = AuthorsCrud::new(&db);
    let author = authors
        .create(AuthorCreate {
            name: "Frank".into(),
            surname: "Herbert".into(),
            year_of_birth: 1920,
            biography: None,
        })
        .await
        .unwrap();
    let keys = [
        (book_author::Column::BookId, book.id),
        (book_author::Column::AuthorId, author.id),
    ];

    ensure_association_absent::<book_author::Entity, _>(&db, &keys)
        .await
        .unwrap();
    let err = fetch_association::<book_author::Entity, _>(&db, &keys)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Association not found");

    authors.add_book(author.id, book.id).await.unwrap();
    let link = fetch_association::<book_author::Entity, _>(&db, &keys)
        .await
        .unwrap();
    assert_eq!((link.book_id, link.author_id), (book.id, author.id));

    let err = ensure_association_absent::<book_author::Entity, _>(&db, &keys)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Association already exists");

    // Adding twice leaves exactly one row
    assert!(authors.add_book(author.id, book.id).await.is_err());
    authors.remove_book(author.id, book.id).await.unwrap();
    assert!(authors.remove_book(author.id, book.id).await.is_err());
    ensure_association_absent::<book_author::Entity, _>(&db, &keys)
        .await
        .unwrap();

    authors.add_book(author.id, book.id).await.unwrap();
    fetch_association::<book_author::Entity, _>(&db, &keys)
        .await
        .unwrap();
}
