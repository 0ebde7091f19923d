use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::MergeIntoActiveModel;
use crate::entities::book;
use crate::validation::{Validatable, ValidationErrors, validators};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub year_of_publication: i32,
    /// 13 digits, unique across the catalog
    pub isbn: String,
    pub series: String,
    pub file_link: String,
    pub edition: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<book::Model> for Book {
    fn from(model: book::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            year_of_publication: model.year_of_publication,
            isbn: model.isbn,
            series: model.series,
            file_link: model.file_link,
            edition: model.edition,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BookCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(minimum = 1000, maximum = 9999)]
    pub year_of_publication: i32,
    #[schema(pattern = r"^\d{13}$")]
    pub isbn: String,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub file_link: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
}

impl Validatable for BookCreate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(validators::validate_year(
            "year_of_publication",
            self.year_of_publication,
        ));
        errors.check(validators::validate_isbn("isbn", &self.isbn));
        errors.result()
    }
}

impl From<BookCreate> for book::ActiveModel {
    fn from(create: BookCreate) -> Self {
        Self {
            id: NotSet,
            title: Set(create.title),
            description: Set(create.description.unwrap_or_default()),
            year_of_publication: Set(create.year_of_publication),
            isbn: Set(create.isbn),
            series: Set(create.series.unwrap_or_default()),
            file_link: Set(create.file_link.unwrap_or_default()),
            edition: Set(create.edition.unwrap_or_default()),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}

/// Partial update; absent (or null) fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(minimum = 1000, maximum = 9999)]
    pub year_of_publication: Option<i32>,
    #[schema(pattern = r"^\d{13}$")]
    pub isbn: Option<String>,
    pub series: Option<String>,
    pub file_link: Option<String>,
    pub edition: Option<String>,
}

impl Validatable for BookUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(year) = self.year_of_publication {
            errors.check(validators::validate_year("year_of_publication", year));
        }
        if let Some(isbn) = &self.isbn {
            errors.check(validators::validate_isbn("isbn", isbn));
        }
        errors.result()
    }
}

impl MergeIntoActiveModel<book::ActiveModel> for BookUpdate {
    fn merge_into_activemodel(self, mut existing: book::ActiveModel) -> book::ActiveModel {
        if let Some(title) = self.title {
            existing.title = Set(title);
        }
        if let Some(description) = self.description {
            existing.description = Set(description);
        }
        if let Some(year) = self.year_of_publication {
            existing.year_of_publication = Set(year);
        }
        if let Some(isbn) = self.isbn {
            existing.isbn = Set(isbn);
        }
        if let Some(series) = self.series {
            existing.series = Set(series);
        }
        if let Some(file_link) = self.file_link {
            existing.file_link = Set(file_link);
        }
        if let Some(edition) = self.edition {
            existing.edition = Set(edition);
        }
        existing
    }
}
