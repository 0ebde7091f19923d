use sea_orm::{Set, entity::prelude::*};

/// Reader with no extra rights.
pub const READER: i32 = 0;
/// May create, update and delete catalog records.
pub const LIBRARIAN: i32 = 1;
pub const ADMIN: i32 = 2;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub surname: String,
    pub avatar_link: String,
    pub hashed_password: String,
    pub access_level: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    #[must_use]
    pub fn is_librarian(&self) -> bool {
        self.access_level >= LIBRARIAN
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

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
