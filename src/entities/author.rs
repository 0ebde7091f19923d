use sea_orm::{Order, Set, entity::prelude::*};

use crate::core::Resource;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "authors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub year_of_birth: i32,
    #[sea_orm(column_type = "Text")]
    pub biography: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book_author::Entity")]
    BookAuthor,
}

impl Related<super::book_author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookAuthor.def()
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
    const RESOURCE_NAME: &'static str = "Author";

    // biography is sortable only
    fn filterable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("name", Column::Name),
            ("surname", Column::Surname),
            ("year_of_birth", Column::YearOfBirth),
            ("created_at", Column::CreatedAt),
            ("updated_at", Column::UpdatedAt),
        ]
    }

    fn sortable_columns() -> Vec<(&'static str, Column)> {
        vec![
            ("name", Column::Name),
            ("surname", Column::Surname),
            ("year_of_birth", Column::YearOfBirth),
            ("biography", Column::Biography),
            ("created_at", Column::CreatedAt),
            ("updated_at", Column::UpdatedAt),
        ]
    }

    fn default_order() -> (Column, Order) {
        (Column::Id, Order::Asc)
    }
}
