use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::MergeIntoActiveModel;
use crate::entities::genre;
use crate::validation::{Validatable, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<genre::Model> for Genre {
    fn from(model: genre::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct GenreCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// Genres carry no field rules beyond their shape.
impl Validatable for GenreCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl From<GenreCreate> for genre::ActiveModel {
    fn from(create: GenreCreate) -> Self {
        Self {
            id: NotSet,
            name: Set(create.name),
            description: Set(create.description.unwrap_or_default()),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct GenreUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Validatable for GenreUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

impl MergeIntoActiveModel<genre::ActiveModel> for GenreUpdate {
    fn merge_into_activemodel(self, mut existing: genre::ActiveModel) -> genre::ActiveModel {
        if let Some(name) = self.name {
            existing.name = Set(name);
        }
        if let Some(description) = self.description {
            existing.description = Set(description);
        }
        existing
    }
}
