use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::JoinType,
};

use super::{fetch_page, prepare};
use crate::core::guards::ASSOCIATION_EXISTS;
use crate::core::{
    MergeIntoActiveModel, ensure_association_absent, ensure_unique, fetch_association,
    fetch_by_id,
};
use crate::entities::{author, book, book_author, book_genre, genre};
use crate::errors::{CatalogError, Result};
use crate::filtering::{ListQuery, Page};
use crate::models::{BookCreate, BookUpdate};

pub const ISBN_TAKEN: &str = "ISBN must be unique";

/// Book records and their author / genre associations.
pub struct BooksCrud<'a, C> {
    db: &'a C,
}

impl<'a, C> BooksCrud<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ListQuery<book::Entity>) -> Result<Page<book::Model>> {
        let select = prepare(self.db, book::Entity::find(), query)?;
        fetch_page(self.db, select, query).await
    }

    pub async fn get(&self, id: i32) -> Result<book::Model> {
        fetch_by_id::<book::Entity, _>(self.db, id).await
    }

    #[tracing::instrument(skip(self, payload), fields(isbn = %payload.isbn))]
    pub async fn create(&self, payload: BookCreate) -> Result<book::Model> {
        let txn = self.db.begin().await?;
        ensure_unique::<book::Entity, _, _>(&txn, book::Column::Isbn, payload.isbn.clone(), ISBN_TAKEN)
            .await?;

        let model = book::ActiveModel::from(payload)
            .insert(&txn)
            .await
            .map_err(|e| CatalogError::from_write(e, ISBN_TAKEN))?;
        txn.commit().await?;

        tracing::info!(book_id = model.id, "book created");
        Ok(model)
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn update(&self, id: i32, payload: BookUpdate) -> Result<book::Model> {
        let txn = self.db.begin().await?;
        let existing = fetch_by_id::<book::Entity, _>(&txn, id).await?;
        if let Some(isbn) = payload.isbn.as_ref().filter(|isbn| **isbn != existing.isbn) {
            ensure_unique::<book::Entity, _, _>(&txn, book::Column::Isbn, isbn.clone(), ISBN_TAKEN)
                .await?;
        }

        let model = payload
            .merge_into_activemodel(existing.into_active_model())
            .update(&txn)
            .await
            .map_err(|e| CatalogError::from_write(e, ISBN_TAKEN))?;
        txn.commit().await?;

        tracing::info!(book_id = model.id, "book updated");
        Ok(model)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        let existing = fetch_by_id::<book::Entity, _>(&txn, id).await?;
        existing.delete(&txn).await?;
        txn.commit().await?;

        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    pub async fn list_authors(
        &self,
        book_id: i32,
        query: &ListQuery<author::Entity>,
    ) -> Result<Page<author::Model>> {
        let select = author::Entity::find()
            .join(JoinType::InnerJoin, author::Relation::BookAuthor.def())
            .filter(book_author::Column::BookId.eq(book_id));
        self.get(book_id).await?;
        let select = prepare(self.db, select, query)?;
        fetch_page(self.db, select, query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_author(&self, book_id: i32, author_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<book::Entity, _>(&txn, book_id).await?;
        fetch_by_id::<author::Entity, _>(&txn, author_id).await?;
        let keys = [
            (book_author::Column::BookId, book_id),
            (book_author::Column::AuthorId, author_id),
        ];
        ensure_association_absent::<book_author::Entity, _>(&txn, &keys).await?;

        book_author::ActiveModel {
            book_id: Set(book_id),
            author_id: Set(author_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CatalogError::from_write(e, ASSOCIATION_EXISTS))?;
        txn.commit().await?;

        tracing::info!(book_id, author_id, "author linked to book");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_author(&self, book_id: i32, author_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<book::Entity, _>(&txn, book_id).await?;
        fetch_by_id::<author::Entity, _>(&txn, author_id).await?;
        let keys = [
            (book_author::Column::BookId, book_id),
            (book_author::Column::AuthorId, author_id),
        ];
        fetch_association::<book_author::Entity, _>(&txn, &keys)
            .await?
            .delete(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(book_id, author_id, "author unlinked from book");
        Ok(())
    }

    pub async fn list_genres(
        &self,
        book_id: i32,
        query: &ListQuery<genre::Entity>,
    ) -> Result<Page<genre::Model>> {
        let select = genre::Entity::find()
            .join(JoinType::InnerJoin, genre::Relation::BookGenre.def())
            .filter(book_genre::Column::BookId.eq(book_id));
        self.get(book_id).await?;
        let select = prepare(self.db, select, query)?;
        fetch_page(self.db, select, query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_genre(&self, book_id: i32, genre_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<book::Entity, _>(&txn, book_id).await?;
        fetch_by_id::<genre::Entity, _>(&txn, genre_id).await?;
        let keys = [
            (book_genre::Column::BookId, book_id),
            (book_genre::Column::GenreId, genre_id),
        ];
        ensure_association_absent::<book_genre::Entity, _>(&txn, &keys).await?;

        book_genre::ActiveModel {
            book_id: Set(book_id),
            genre_id: Set(genre_id),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| CatalogError::from_write(e, ASSOCIATION_EXISTS))?;
        txn.commit().await?;

        tracing::info!(book_id, genre_id, "genre linked to book");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_genre(&self, book_id: i32, genre_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<book::Entity, _>(&txn, book_id).await?;
        fetch_by_id::<genre::Entity, _>(&txn, genre_id).await?;
        let keys = [
            (book_genre::Column::BookId, book_id),
            (book_genre::Column::GenreId, genre_id),
        ];
        fetch_association::<book_genre::Entity, _>(&txn, &keys)
            .await?
            .delete(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(book_id, genre_id, "genre unlinked from book");
        Ok(())
    }
}
