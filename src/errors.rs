//! # Error handling for the catalog API
//!
//! Every repository, guard and filter routine returns [`CatalogError`]. The
//! variants are the typed outcomes of the core logic (validation failure,
//! missing record, conflict); only the HTTP boundary turns them into status
//! codes through [`IntoResponse`].
//!
//! The response body is always `{"detail": "<message>"}`. Database and other
//! internal failures are logged through `tracing` and replaced by a generic
//! message so that driver details never reach the client.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use utoipa::ToSchema;

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// Typed error shared by the whole crate.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 422 - malformed or disallowed client input (filters, sort, payloads)
    #[error("{0}")]
    Validation(String),

    /// 404 - a referenced record or association does not exist
    #[error("{0}")]
    NotFound(String),

    /// 400 - uniqueness violation or duplicate association
    #[error("{0}")]
    Conflict(String),

    /// 401 - credentials missing meaning, expired or pointing nowhere
    #[error("{0}")]
    Unauthorized(String),

    /// 403 - authenticated but not allowed
    #[error("{0}")]
    Forbidden(String),

    /// 500 - database failure (details logged, not exposed)
    #[error("A database error occurred")]
    Database(#[source] DbErr),

    /// 500 - any other internal failure (details logged, not exposed)
    #[error("Internal server error")]
    Internal(String),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal(details.into())
    }

    /// Convert a failed write, reporting a lost uniqueness race with the same
    /// message the pre-insert guard would have produced.
    pub fn from_write(err: DbErr, conflict_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::conflict(conflict_message),
            _ => Self::Database(err),
        }
    }

    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Database(internal) => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal(details) => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self,
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error body sent to clients
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Unique-constraint violations become conflicts; everything else is a 500.
impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::conflict("Unique constraint violated")
            }
            _ => Self::Database(err),
        }
    }
}

impl From<JsonRejection> for CatalogError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for CatalogError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for CatalogError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}
