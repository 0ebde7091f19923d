#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bookshelf::{
    auth::JwtManager,
    crud::UsersCrud,
    entities::user,
    migration::Migrator,
    models::SignUp,
    routes,
    state::AppState,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "Passw0rdOk";

/// In-memory SQLite kept on a single connection so every query sees the
/// migrated schema.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to sqlite");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn jwt() -> JwtManager {
    JwtManager::new(SECRET, chrono::Duration::minutes(60))
}

pub fn setup_test_app(db: &DatabaseConnection) -> Router {
    routes::app(AppState::new(db.clone(), jwt()), &[])
}

pub async fn setup() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    (setup_test_app(&db), db)
}

pub async fn create_user(db: &DatabaseConnection, email: &str, access_level: i32) -> user::Model {
    let users = UsersCrud::new(db);
    let created = users
        .sign_up(SignUp {
            name: "Test".into(),
            surname: "User".into(),
            email: email.into(),
            password: PASSWORD.into(),
            avatar_link: String::new(),
        })
        .await
        .expect("Failed to sign up");
    if access_level == user::READER {
        return created;
    }
    users
        .grant(email, access_level)
        .await
        .expect("Failed to grant access level")
}

pub async fn librarian_token(db: &DatabaseConnection) -> String {
    let user = create_user(db, "librarian@example.com", user::LIBRARIAN).await;
    jwt().issue(user.id).unwrap()
}

pub async fn reader_token(db: &DatabaseConnection) -> String {
    let user = create_user(db, "reader@example.com", user::READER).await;
    jwt().issue(user.id).unwrap()
}

/// Send one request and return the status with the parsed JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None).await
}

/// Build `?k=v&...` with every value percent-encoded.
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    let encoded: Vec<String> = pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", url_escape::encode_component(value)))
        .collect();
    format!("?{}", encoded.join("&"))
}

pub fn book_payload(title: &str, year: i32, isbn: &str) -> Value {
    json!({
        "title": title,
        "year_of_publication": year,
        "isbn": isbn,
    })
}

pub async fn create_book(app: &Router, token: &str, payload: Value) -> Value {
    let (status, body) = send(app, "POST", "/api/v1/books", Some(token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create book failed: {body}");
    body
}

pub async fn create_author(app: &Router, token: &str, payload: Value) -> Value {
    let (status, body) = send(app, "POST", "/api/v1/authors", Some(token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create author failed: {body}");
    body
}

pub async fn create_genre(app: &Router, token: &str, payload: Value) -> Value {
    let (status, body) = send(app, "POST", "/api/v1/genres", Some(token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create genre failed: {body}");
    body
}

/// Titles of a page body, in order.
pub fn titles(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap().to_owned())
        .collect()
}
