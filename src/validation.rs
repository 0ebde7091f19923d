//! Validation Support
//!
//! Create/Update payloads implement [`Validatable`]; the
//! [`ValidJson`](crate::extract::ValidJson) extractor runs it before a handler
//! sees the payload, so repositories only ever receive checked input.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookshelf::validation::{Validatable, ValidationErrors, validators};
//!
//! impl Validatable for AuthorCreate {
//!     fn validate(&self) -> Result<(), ValidationErrors> {
//!         let mut errors = ValidationErrors::new();
//!         errors.check(validators::validate_year("year_of_birth", self.year_of_birth));
//!         errors.result()
//!     }
//! }
//! ```

use serde::Serialize;
use std::fmt;

use crate::errors::CatalogError;

/// Validation error with field name and message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Record the outcome of a single validator
    pub fn check(&mut self, outcome: Result<(), ValidationError>) {
        if let Err(error) = outcome {
            self.add(error);
        }
    }

    /// Check if there are any errors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one error was recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// Trait for payloads that can be validated
pub trait Validatable {
    /// Validate the instance
    ///
    /// # Errors
    ///
    /// Every failed check, in field order.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Helper validators for the catalog's field rules
pub mod validators {
    use std::sync::LazyLock;

    use regex::Regex;

    use super::ValidationError;

    pub const MIN_YEAR: i32 = 1000;
    pub const MAX_YEAR: i32 = 9999;
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    pub const MAX_PASSWORD_LENGTH: usize = 100;

    static ISBN: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[0-9]{13}$").expect("ISBN pattern compiles"));

    static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    });

    /// Validate a four digit year
    pub fn validate_year(field: &str, value: i32) -> Result<(), ValidationError> {
        if (MIN_YEAR..=MAX_YEAR).contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!("Must be between {MIN_YEAR} and {MAX_YEAR}"),
            ))
        }
    }

    /// ISBN-13 written as exactly 13 digits
    pub fn validate_isbn(field: &str, value: &str) -> Result<(), ValidationError> {
        if ISBN.is_match(value) {
            Ok(())
        } else {
            Err(ValidationError::new(field, "Must be exactly 13 digits"))
        }
    }

    pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.len() > 255 {
            return Err(ValidationError::new(
                field,
                "Email must be at most 255 characters",
            ));
        }
        if !EMAIL.is_match(value) {
            return Err(ValidationError::new(field, "Invalid email format"));
        }
        Ok(())
    }

    /// 8 to 100 ASCII letters and digits with at least one lowercase letter,
    /// one uppercase letter and one digit
    pub fn validate_password(field: &str, value: &str) -> Result<(), ValidationError> {
        let length = value.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::new(
                field,
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long"),
            ));
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(ValidationError::new(
                field,
                format!("Password must be at most {MAX_PASSWORD_LENGTH} characters long"),
            ));
        }

        let alphanumeric = value.chars().all(|c| c.is_ascii_alphanumeric());
        let lower = value.chars().any(|c| c.is_ascii_lowercase());
        let upper = value.chars().any(|c| c.is_ascii_uppercase());
        let digit = value.chars().any(|c| c.is_ascii_digit());
        if !(alphanumeric && lower && upper && digit) {
            return Err(ValidationError::new(
                field,
                "Password must contain at least one uppercase letter, one lowercase letter and one digit",
            ));
        }
        Ok(())
    }
}
