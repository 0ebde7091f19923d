use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::JoinType,
};

use super::{fetch_page, prepare};
use crate::core::guards::ASSOCIATION_EXISTS;
use crate::core::{MergeIntoActiveModel, ensure_association_absent, fetch_association, fetch_by_id};
use crate::entities::{author, book, book_author};
use crate::errors::{CatalogError, Result};
use crate::filtering::{ListQuery, Page};
use crate::models::{AuthorCreate, AuthorUpdate};

pub struct AuthorsCrud<'a, C> {
    db: &'a C,
}

impl<'a, C> AuthorsCrud<'a, C>
where
    C: ConnectionTrait + TransactionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ListQuery<author::Entity>) -> Result<Page<author::Model>> {
        let select = prepare(self.db, author::Entity::find(), query)?;
        fetch_page(self.db, select, query).await
    }

    pub async fn get(&self, id: i32) -> Result<author::Model> {
        fetch_by_id::<author::Entity, _>(self.db, id).await
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn create(&self, payload: AuthorCreate) -> Result<author::Model> {
        let txn = self.db.begin().await?;
        let model = author::ActiveModel::from(payload).insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(author_id = model.id, "author created");
        Ok(model)
    }

    #[tracing::instrument(skip(self, payload))]
    pub async fn update(&self, id: i32, payload: AuthorUpdate) -> Result<author::Model> {
        let txn = self.db.begin().await?;
        let existing = fetch_by_id::<author::Entity, _>(&txn, id).await?;
        let model = payload
            .merge_into_activemodel(existing.into_active_model())
            .update(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(author_id = model.id, "author updated");
        Ok(model)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<author::Entity, _>(&txn, id)
            .await?
            .delete(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(author_id = id, "author deleted");
        Ok(())
    }

    pub async fn list_books(
        &self,
        author_id: i32,
        query: &ListQuery<book::Entity>,
    ) -> Result<Page<book::Model>> {
        let select = book::Entity::find()
            .join(JoinType::InnerJoin, book::Relation::BookAuthor.def())
            .filter(book_author::Column::AuthorId.eq(author_id));
        self.get(author_id).await?;
        let select = prepare(self.db, select, query)?;
        fetch_page(self.db, select, query).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_book(&self, author_id: i32, book_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<author::Entity, _>(&txn, author_id).await?;
        fetch_by_id::<book::Entity, _>(&txn, book_id).await?;
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

        tracing::info!(author_id, book_id, "book linked to author");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_book(&self, author_id: i32, book_id: i32) -> Result<()> {
        let txn = self.db.begin().await?;
        fetch_by_id::<author::Entity, _>(&txn, author_id).await?;
        fetch_by_id::<book::Entity, _>(&txn, book_id).await?;
        let keys = [
            (book_author::Column::BookId, book_id),
            (book_author::Column::AuthorId, author_id),
        ];
        fetch_association::<book_author::Entity, _>(&txn, &keys)
            .await?
            .delete(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(author_id, book_id, "book unlinked from author");
        Ok(())
    }
}
