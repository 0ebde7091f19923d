mod common;

use axum::{Router, http::StatusCode};
use common::{book_payload, create_book, get, librarian_token, query_string, setup, titles};

async fn seeded() -> Router {
    let (app, db) = setup().await;
    let token = librarian_token(&db).await;
    for (title, year, isbn) in [
        ("Dune", 1965, "9780441172719"),
        ("Emma", 1815, "9780141439587"),
        ("War and Peace", 1869, "9781400079988"),
        ("The War of the Worlds", 1898, "9780141441030"),
        ("Dune: Messiah", 1969, "9780593098233"),
    ] {
        create_book(&app, &token, book_payload(title, year, isbn)).await;
    }
    app
}

async fn list(app: &Router, pairs: &[(&str, &str)]) -> (StatusCode, serde_json::Value) {
    get(app, &format!("/api/v1/books{}", query_string(pairs))).await
}

async fn list_titles(app: &Router, pairs: &[(&str, &str)]) -> Vec<String> {
    let (status, page) = list(app, pairs).await;
    assert_eq!(status, StatusCode::OK, "{page}");
    titles(&page)
}

#[tokio::test]
async fn test_comparison_operators() {
    let app = seeded().await;

    assert_eq!(list_titles(&app, &[("year_of_publication", "1815")]).await, ["Emma"]);
    assert_eq!(list_titles(&app, &[("year_of_publication", "eq:1815")]).await, ["Emma"]);
    assert_eq!(list_titles(&app, &[("year_of_publication", "ne:1815")]).await.len(), 4);
    assert_eq!(
        list_titles(&app, &[("year_of_publication", "lt:1869")]).await,
        ["Emma"]
    );
    assert_eq!(
        list_titles(&app, &[("year_of_publication", "lte:1869")]).await,
        ["Emma", "War and Peace"]
    );
    assert_eq!(
        list_titles(&app, &[("year_of_publication", "gt:1965")]).await,
        ["Dune: Messiah"]
    );
    assert_eq!(
        list_titles(&app, &[("year_of_publication", "gte:1965")]).await,
        ["Dune", "Dune: Messiah"]
    );
}

#[tokio::test]
async fn test_in_operator() {
    let app = seeded().await;
    assert_eq!(
        list_titles(&app, &[("year_of_publication", "in:1815,1965,2001")]).await,
        ["Dune", "Emma"]
    );
    assert_eq!(
        list_titles(&app, &[("title", "in:Emma,Dune")]).await,
        ["Dune", "Emma"]
    );
}

#[tokio::test]
async fn test_like_is_case_sensitive_and_ilike_is_not() {
    let app = seeded().await;

    assert_eq!(
        list_titles(&app, &[("title", "like:%War%")]).await,
        ["War and Peace", "The War of the Worlds"]
    );
    assert!(list_titles(&app, &[("title", "like:%war%")]).await.is_empty());
    assert_eq!(
        list_titles(&app, &[("title", "ilike:%war%")]).await,
        ["War and Peace", "The War of the Worlds"]
    );
    assert_eq!(list_titles(&app, &[("title", "like:Dun_")]).await, ["Dune"]);
}

#[tokio::test]
async fn test_only_first_colon_separates_the_operator() {
    let app = seeded().await;
    assert_eq!(
        list_titles(&app, &[("title", "eq:Dune: Messiah")]).await,
        ["Dune: Messiah"]
    );
}

#[tokio::test]
async fn test_repeated_filters_are_combined() {
    let app = seeded().await;
    assert_eq!(
        list_titles(
            &app,
            &[
                ("year_of_publication", "gte:1800"),
                ("year_of_publication", "lt:1870"),
            ],
        )
        .await,
        ["Emma", "War and Peace"]
    );
    assert_eq!(
        list_titles(
            &app,
            &[("title", "ilike:dune%"), ("year_of_publication", "lt:1966")],
        )
        .await,
        ["Dune"]
    );
}

#[tokio::test]
async fn test_timestamp_filters() {
    let app = seeded().await;
    assert_eq!(list_titles(&app, &[("created_at", "lt:2999-01-01")]).await.len(), 5);
    assert!(
        list_titles(&app, &[("created_at", "gt:2999-01-01T00:00:00Z")])
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_rejected_filters() {
    let app = seeded().await;

    for (pairs, detail) in [
        (
            vec![("pages", "300")],
            "Filtering by 'pages' is not allowed.",
        ),
        (
            vec![("file_link", "eq:x")],
            "Filtering by 'file_link' is not allowed.",
        ),
        (
            vec![("title", "zz:abc")],
            "Unsupported filter operator: 'zz'",
        ),
        (
            vec![("year_of_publication", "gte:abc")],
            "Invalid value 'abc' for filter 'year_of_publication'",
        ),
        (
            vec![("year_of_publication", "like:19%")],
            "Operator 'like' is not supported for filter 'year_of_publication'",
        ),
    ] {
        let (status, body) = list(&app, &pairs).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{pairs:?}");
        assert_eq!(body["detail"], detail);
    }
}

#[tokio::test]
async fn test_authors_allow_list() {
    let (app, _db) = setup().await;

    let (status, _) = get(&app, "/api/v1/authors?surname=ilike:%25pratch%25").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/api/v1/authors?biography=ilike:%25x%25").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Filtering by 'biography' is not allowed.");

    let (status, _) = get(&app, "/api/v1/authors?sort_by=biography").await;
    assert_eq!(status, StatusCode::OK);
}
