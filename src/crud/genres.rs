use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::JoinType,
};

use super::{fetch_page, prepare};
use crate::core::guards::ASSOCIATION_EXISTS;
use crate::core::{MergeIntoActiveModel, ensure_association_absent, fetch_association, fetch_by_id};
use crate::entities::{book, book_genre, genre};
use crate::errors::{CatalogError, Result};
use crate::filtering::{ListQuery, Page};
use crate::models::{GenreCreate, GenreUpdate};

pub struct GenresCrud<'a, C> {
    db: &'a C,
}

impl<'a, C> GenresCrud<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Newest genres first unless the caller sorts.
    pub async fn list(&self, query: &ListQuery<genre::Entity>) -> Result<Page<genre::Model>> {
        let select = prepare(self.db, genre::Entity::find(), query)?;
        fetch_page(self.db, select, query).await
    }

    pub async fn get(&self, id: i32) -> Result<genre::Model> {
        fetch_by_id::<genre::Entity, _>(self.db, id).await
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn create(&self, payload: GenreCreate) -> Result<genre::Model> {
        let txn = self.db.begin().await?;
        let model = genre::ActiveModel::from(payload).insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(genre_id = model.id, "genre created");
        Ok(model)
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn update(&self, id: i32, payload: GenreUpdate) -> Result<genre::Model> {
        let txn = self.db.begin().await?;
        let existing = fetch_by_id::<genre::Entity, _>(&txn, id).await?;
        let model = payload
            .merge_into_activemodel(existing.into_active_model())
            .update(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(genre_id = model.id, "genre updated");
        Ok(model)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<genre::Entity, _>(&txn, id)
            .await?
            .delete(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(genre_id = id, "genre deleted");
        Ok(())
    }

    pub async fn list_books(
        &self,
        genre_id: i32,
        query: &ListQuery<book::Entity>,
    ) -> Result<Page<book::Model>> {
        let select = book::Entity::find()
            .join(JoinType::InnerJoin, book::Relation::BookGenre.def())
            .filter(book_genre::Column::GenreId.eq(genre_id));
        self.get(genre_id).await?;
        let select = prepare(self.db, select, query)?;
        fetch_page(self.db, select, query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_book(&self, genre_id: i32, book_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<genre::Entity, _>(&txn, genre_id).await?;
        fetch_by_id::<book::Entity, _>(&txn, book_id).await?;
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

        tracing::info!(genre_id, book_id, "book linked to genre");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_book(&self, genre_id: i32, book_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<genre::Entity, _>(&txn, genre_id).await?;
        fetch_by_id::<book::Entity, _>(&txn, book_id).await?;
        let keys = [
            (book_genre::Column::BookId, book_id),
            (book_genre::Column::GenreId, genre_id),
        ];
        fetch_association::<book_genre::Entity, _>(&txn, &keys)
            .await?
            .delete(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(genre_id, book_id, "book unlinked from genre");
        Ok(())
    }
}
