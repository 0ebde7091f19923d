//! Session authentication.
//!
//! [`CurrentUser`] resolves `Authorization: Bearer <token>` to a stored user;
//! [`Librarian`] additionally requires an access level of at least 1.

pub mod jwt;
pub mod password;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use sea_orm::EntityTrait;

use crate::entities::user;
use crate::errors::CatalogError;
use crate::state::AppState;

pub use jwt::{Claims, JwtManager};
pub use password::{hash_password, hash_password_async, verify_password, verify_password_async};

pub const NOT_AUTHENTICATED: &str = "Not authenticated";
pub const INSUFFICIENT_RIGHTS: &str = "Insufficient rights";
pub const UNKNOWN_USER: &str = "Token pointing to non-existent user";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// The signed-in user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub user::Model);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| CatalogError::forbidden(NOT_AUTHENTICATED))?;

        let user_id = state.jwt.validate(token)?.user_id()?;
        let user = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| CatalogError::unauthorized(UNKNOWN_USER))?;

        Ok(Self(user))
    }
}

/// A signed-in user allowed to change the catalog.
#[derive(Debug, Clone)]
pub struct Librarian(pub user::Model);

impl<S> FromRequestParts<S> for Librarian
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_librarian() {
            tracing::debug!(user_id = user.id, "catalog change refused");
            return Err(CatalogError::forbidden(INSUFFICIENT_RIGHTS));
        }
        Ok(Self(user))
    }
}
