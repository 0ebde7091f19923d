use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::MergeIntoActiveModel;
use crate::entities::author;
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub year_of_birth: i32,
    pub biography: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<author::Model> for Author {
    fn from(model: author::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            surname: model.surname,
            year_of_birth: model.year_of_birth,
            biography: model.biography,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AuthorCreate {
    pub name: String,
    pub surname: String,
    #[schema(minimum = 1000, maximum = 9999)]
    pub year_of_birth: i32,
    #[serde(default)]
    pub biography: Option<String>,
}

impl Validatable for AuthorCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_year("year_of_birth", self.year_of_birth));
        errors.result()
    }
}

impl From<AuthorCreate> for author::ActiveModel {
    fn from(create: AuthorCreate) -> Self {
        Self {
            id: NotSet,
            name: Set(create.name),
            surname: Set(create.surname),
            year_of_birth: Set(create.year_of_birth),
            biography: Set(create.biography.unwrap_or_default()),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AuthorUpdate {
    pub name: Option<String>,
    pub surname: Option<String>,
    #[schema(minimum = 1000, maximum = 9999)]
    pub year_of_birth: Option<i32>,
    pub biography: Option<String>,
}

impl Validatable for AuthorUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(year) = self.year_of_birth {
            errors.check(validators::validate_year("year_of_birth", year));
        }
        errors.result()
    }
}

impl MergeIntoActiveModel<author::ActiveModel> for AuthorUpdate {
    fn merge_into_activemodel(self, mut existing: author::ActiveModel) -> author::ActiveModel {
        if let Some(name) = self.name {
            existing.name = Set(name);
        }
        if let Some(surname) = self.surname {
            existing.surname = Set(surname);
        }
        if let Some(year) = self.year_of_birth {
            existing.year_of_birth = Set(year);
        }
        if let Some(biography) = self.biography {
            existing.biography = Set(biography);
        }
        existing
    }
}
