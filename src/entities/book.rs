use sea_orm::{Order, Set, entity::prelude::*};

use crate::core::Resource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub year_of_publication: i32,
    #[sea_orm(unique)]
    pub isbn: String,
    pub series: String,
    pub file_link: String,
    pub edition: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book_author::Entity")]
    BookAuthor,
    #[sea_orm(has_many = "super::book_genre::Entity")]
    BookGenre,
}

impl Related<super::book_author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookAuthor.def()
    }
}

impl Related<super::book_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookGenre.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl Resource for Entity {
    const RESOURCE_NAME: &'static str = "Book";

    fn filterable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("title", Column::Title),
            ("description", Column::Description),
            ("year_of_publication", Column::YearOfPublication),
            ("isbn", Column::Isbn),
            ("series", Column::Series),
            ("edition", Column::Edition),
            ("created_at", Column::CreatedAt),
            ("updated_at", Column::UpdatedAt),
        ]
    }

    fn sortable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("title", Column::Title),
            ("description", Column::Description),
            ("year_of_publication", Column::YearOfPublication),
            ("isbn", Column::Isbn),
            ("series", Column::Series),
            ("file_link", Column::FileLink),
            ("edition", Column::Edition),
            ("created_at", Column::CreatedAt),
            ("updated_at", Column::UpdatedAt),
        ]
    }

    fn default_order() -> (Column, Order) {
        (Column::Id, Order::Asc)
    }
}
