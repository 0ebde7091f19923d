mod common;

use axum::http::StatusCode;
use common::{create_genre, get, librarian_token, setup};
use serde_json::json;

async fn seeded(count: usize) -> axum::Router {
    let (app, db) = setup().await;
    let token = librarian_token(&db).await;
    for index in 0..count {
        create_genre(&app, &token, json!({"name": format!("Genre {index:02}")})).await;
    }
    app
}

#[tokio::test]
async fn test_default_window() {
    let app = seeded(3).await;
    let (status, page) = get(&app, "/api/v1/genres").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 1);
    assert_eq!(page["size"], 50);
    assert_eq!(page["pages"], 1);
    assert_eq!(page["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_pages_partition_the_result() {
    let app = seeded(7).await;

    let mut seen = Vec::new();
    for number in 1..=3 {
        let (status, page) = get(
            &app,
            &format!("/api/v1/genres?sort_by=name&size=3&page={number}"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 7);
        assert_eq!(page["pages"], 3);
        assert_eq!(page["page"], number);
        for item in page["items"].as_array().unwrap() {
            seen.push(item["name"].as_str().unwrap().to_owned());
        }
    }

    let expected: Vec<String> = (0..7).map(|index| format!("Genre {index:02}")).collect();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = seeded(2).await;
    let (status, page) = get(&app, "/api/v1/genres?page=5&size=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["pages"], 2);
    assert_eq!(page["items"], json!([]));
}

#[tokio::test]
async fn test_huge_page_is_empty() {
    let app = seeded(2).await;
    let (status, page) = get(&app, "/api/v1/genres?page=9223372036854775807&size=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 2);
    assert_eq!(page["page"], 9_223_372_036_854_775_807_u64);
    assert_eq!(page["items"], json!([]));
}

#[tokio::test]
async fn test_empty_collection() {
    let (app, _db) = setup().await;
    let (status, page) = get(&app, "/api/v1/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 0);
    assert_eq!(page["pages"], 0);
}

#[tokio::test]
async fn test_total_counts_filtered_rows() {
    let app = seeded(12).await;
    let (_, page) = get(&app, "/api/v1/genres?name=like:Genre%200%25&size=4").await;
    assert_eq!(page["total"], 10);
    assert_eq!(page["pages"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_invalid_window() {
    let app = seeded(1).await;
    for (query, detail) in [
        ("page=0", "Query parameter 'page' must be a positive integer"),
        ("size=0", "Query parameter 'size' must be a positive integer"),
        ("page=abc", "Query parameter 'page' must be a positive integer"),
        (
            "page=9223372036854775808",
            "Query parameter 'page' must be a positive integer",
        ),
        (
            "size=9223372036854775808",
            "Query parameter 'size' must be a positive integer",
        ),
    ] {
        let (status, body) = get(&app, &format!("/api/v1/genres?{query}")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["detail"], detail);
    }
}

#[tokio::test]
async fn test_last_reserved_parameter_wins() {
    let app = seeded(3).await;
    let (_, page) = get(&app, "/api/v1/genres?size=1&size=2").await;
    assert_eq!(page["size"], 2);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
}
