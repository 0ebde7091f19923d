//! HTTP surface: catalog, session and documentation routes.

pub mod authors;
pub mod books;
pub mod genres;
pub mod sessions;

use std::time::Duration;

use axum::{
    Json, Router,
    http::{Method, header},
    routing::get,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi, ToSchema,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_scalar::{Scalar, Servable};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "Bookshelf", description = "Catalog of books, authors and genres"),
    modifiers(&BearerAuth),
    tags(
        (name = "books", description = "Books and their authors and genres"),
        (name = "authors", description = "Authors and their books"),
        (name = "genres", description = "Genres and their books"),
        (name = "sessions", description = "Accounts and access tokens")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is up", body = Health))
)]
pub async fn healthcheck() -> Json<Health> {
    Json(Health {
        status: "healthy".to_owned(),
    })
}

/// CORS for the configured origins; any origin when none are given.
#[must_use]
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600));

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

/// Routes and their OpenAPI document, before state and layers are attached.
pub fn api() -> (Router<AppState>, utoipa::openapi::OpenApi) {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(healthcheck))
        .merge(books::router())
        .merge(authors::router())
        .merge(genres::router())
        .merge(sessions::router())
        .split_for_parts()
}

/// The complete application.
pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    let (router, openapi) = api();
    let document = openapi.clone();

    router
        .route(
            "/openapi.json",
            get(move || {
                let document = document.clone();
                async move { Json(document) }
            }),
        )
        .merge(Scalar::with_url("/docs", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_every_path() {
        let (_, openapi) = api();
        let paths: Vec<&str> = openapi.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/",
            "/api/v1/books",
            "/api/v1/books/{book_id}",
            "/api/v1/books/{book_id}/authors/{author_id}",
            "/api/v1/books/{book_id}/genres",
            "/api/v1/authors/{author_id}/books",
            "/api/v1/genres/{genre_id}/books/{book_id}",
            "/sessions/sign_in",
            "/sessions/current_user",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
