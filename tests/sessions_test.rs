mod common;

use axum::http::StatusCode;
use bookshelf::auth::JwtManager;
use common::{PASSWORD, SECRET, create_user, get, jwt, send, setup};
use serde_json::{Value, json};

fn sign_up_payload(email: &str) -> Value {
    json!({
        "name": "Ada",
        "surname": "Lovelace",
        "email": email,
        "password": PASSWORD,
        "avatar_link": "https://example.com/ada.png",
    })
}

async fn sign_in(app: &axum::Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/sessions/sign_in",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await
}

#[tokio::test]
async fn test_sign_up_and_sign_in() {
    let (app, _db) = setup().await;

    let (status, user) = send(
        &app,
        "POST",
        "/sessions/sign_up",
        None,
        Some(sign_up_payload("ada@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["access_level"], 0);
    assert!(user.get("hashed_password").is_none());
    assert!(user.get("password").is_none());

    let (status, token) = sign_in(&app, "ada@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(token["token_type"], "Bearer");
    let access_token = token["access_token"].as_str().unwrap();

    let (status, me) = send(&app, "GET", "/sessions/current_user", Some(access_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, user);
}

#[tokio::test]
async fn test_sign_up_rejections() {
    let (app, db) = setup().await;
    create_user(&db, "taken@example.com", 0).await;

    let (status, body) = send(
        &app,
        "POST",
        "/sessions/sign_up",
        None,
        Some(sign_up_payload("taken@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already in use");

    let mut weak = sign_up_payload("weak@example.com");
    weak["password"] = json!("password");
    let (status, _) = send(&app, "POST", "/sessions/sign_up", None, Some(weak)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut elevated = sign_up_payload("sneaky@example.com");
    elevated["access_level"] = json!(2);
    let (status, _) = send(&app, "POST", "/sessions/sign_up", None, Some(elevated)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_sign_in_failures() {
    let (app, db) = setup().await;
    create_user(&db, "ada@example.com", 0).await;

    let (status, body) = sign_in(&app, "nobody@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");

    let (status, body) = sign_in(&app, "ada@example.com", "Wr0ngPassword").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid password");

    let (status, _) = sign_in(&app, "ada@example.com", "short").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_token_failures() {
    let (app, db) = setup().await;
    let user = create_user(&db, "ada@example.com", 0).await;

    let (status, body) = get(&app, "/sessions/current_user").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Not authenticated");

    let expired = JwtManager::new(SECRET, chrono::Duration::minutes(-5))
        .issue(user.id)
        .unwrap();
    let (status, body) = send(&app, "GET", "/sessions/current_user", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Token has expired");

    let forged = JwtManager::new("another-secret", chrono::Duration::minutes(5))
        .issue(user.id)
        .unwrap();
    let (status, body) = send(&app, "GET", "/sessions/current_user", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid token");

    let orphan = jwt().issue(user.id + 100).unwrap();
    let (status, body) = send(&app, "GET", "/sessions/current_user", Some(&orphan), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Token pointing to non-existent user");
}

#[tokio::test]
async fn test_update_and_delete_current_user() {
    let (app, db) = setup().await;
    let user = create_user(&db, "ada@example.com", 0).await;
    create_user(&db, "taken@example.com", 0).await;
    let token = jwt().issue(user.id).unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        "/sessions/current_user",
        Some(&token),
        Some(json!({"email": "taken@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already in use");

    let (status, updated) = send(
        &app,
        "PATCH",
        "/sessions/current_user",
        Some(&token),
        Some(json!({"name": "Augusta", "password": "N3wPassword"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Augusta");
    assert_eq!(updated["email"], "ada@example.com");

    let (status, _) = sign_in(&app, "ada@example.com", PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = sign_in(&app, "ada@example.com", "N3wPassword").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", "/sessions/current_user", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", "/sessions/current_user", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Token pointing to non-existent user");
}

#[tokio::test]
async fn test_granted_librarian_can_edit_catalog() {
    let (app, db) = setup().await;
    let user = create_user(&db, "ada@example.com", 0).await;
    let token = jwt().issue(user.id).unwrap();
    let genre = json!({"name": "Poetry"});

    let (status, _) = send(&app, "POST", "/api/v1/genres", Some(&token), Some(genre.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    bookshelf::crud::UsersCrud::new(&db)
        .grant("ada@example.com", bookshelf::entities::user::LIBRARIAN)
        .await
        .unwrap();
    let (status, _) = send(&app, "POST", "/api/v1/genres", Some(&token), Some(genre)).await;
    assert_eq!(status, StatusCode::CREATED);
}
