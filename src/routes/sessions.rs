use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::auth::CurrentUser;
use crate::crud::UsersCrud;
use crate::errors::{ErrorResponse, Result};
use crate::extract::ValidJson;
use crate::models::{SignIn, SignUp, Token, User, UserUpdate};
use crate::state::AppState;

pub fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(sign_up))
        .routes(routes!(sign_in))
        .routes(routes!(get_current_user, update_current_user, delete_current_user))
}

/// Register a reader account
#[utoipa::path(
    post,
    path = "/sessions/sign_up",
    tag = "sessions",
    request_body = SignUp,
    responses(
        (status = StatusCode::CREATED, description = "Account created", body = User),
        (status = StatusCode::BAD_REQUEST, description = "Email already in use", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SignUp>,
) -> Result<(StatusCode, Json<User>)> {
    let user = UsersCrud::new(&state.db).sign_up(payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/sessions/sign_in",
    tag = "sessions",
    request_body = SignIn,
    responses(
        (status = StatusCode::OK, description = "Access token", body = Token),
        (status = StatusCode::UNAUTHORIZED, description = "Invalid password", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "User not found", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<SignIn>,
) -> Result<Json<Token>> {
    let user = UsersCrud::new(&state.db).sign_in(&payload).await?;
    let access_token = state.jwt.issue(user.id)?;
    Ok(Json(Token::bearer(access_token)))
}

#[utoipa::path(
    get,
    path = "/sessions/current_user",
    tag = "sessions",
    security(("bearer" = [])),
    responses(
        (status = StatusCode::OK, description = "The signed-in user", body = User),
        (status = StatusCode::UNAUTHORIZED, description = "Expired or invalid token", body = ErrorResponse),
        (status = StatusCode::FORBIDDEN, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn get_current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user.into())
}

#[utoipa::path(
    patch,
    path = "/sessions/current_user",
    tag = "sessions",
    request_body = UserUpdate,
    security(("bearer" = [])),
    responses(
        (status = StatusCode::OK, description = "Account updated", body = User),
        (status = StatusCode::BAD_REQUEST, description = "Email already in use", body = ErrorResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid payload", body = ErrorResponse)
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(payload): ValidJson<UserUpdate>,
) -> Result<Json<User>> {
    let user = UsersCrud::new(&state.db).update(user, payload).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/sessions/current_user",
    tag = "sessions",
    security(("bearer" = [])),
    responses(
        (status = StatusCode::NO_CONTENT, description = "Account deleted")
    )
)]
pub async fn delete_current_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode> {
    UsersCrud::new(&state.db).delete(user).await?;
    Ok(StatusCode::NO_CONTENT)
}
