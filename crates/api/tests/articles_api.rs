mod common;

use axum::http::{Method, StatusCode};
use common::spawn_app;
use pressroom_common::auth::Role;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_create_then_fetch_by_slug() {
    let app = spawn_app().await;

    let (status, created) = app
        .create("/api/articles/", json!({"title": "A", "slug": "a", "body": "hello"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, article) = app.get("/api/articles/a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(article["id"], id.as_str());
    assert_eq!(article["title"], "A");
    assert_eq!(article["slug"], "a");
    assert_eq!(article["body"], "hello");
    assert_eq!(article["status"], "draft");
    assert_eq!(article["categories"], json!([]));
    assert_eq!(article["tags"], json!([]));

    let (status, by_id) = app.get(&format!("/api/articles/id/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id["slug"], "a");
}

#[tokio::test]
async fn test_missing_article_is_404() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/articles/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_slug_is_conflict() {
    let app = spawn_app().await;

    app.create_id("/api/articles/", json!({"title": "First", "slug": "same", "body": ""}))
        .await;
    let (status, body) = app
        .create("/api/articles/", json!({"title": "Second", "slug": "same", "body": ""}))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, list) = app.get("/api/articles/").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_is_newest_first_and_paged() {
    let app = spawn_app().await;

    for slug in ["one", "two", "three", "four"] {
        app.create_id("/api/articles/", json!({"title": slug, "slug": slug, "body": ""}))
            .await;
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let (status, all) = app.get("/api/articles/").await;
    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["slug"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(slugs, ["four", "three", "two", "one"]);
    assert!(all[0].get("body").is_none());

    let (_, page) = app.get("/api/articles/?limit=2&offset=1").await;
    let slugs: Vec<_> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["three", "two"]);

    let (status, _) = app.get("/api/articles/?limit=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filters_by_category_and_status() {
    let app = spawn_app().await;

    let world = app
        .create_id("/api/categories/", json!({"name": "World"}))
        .await;
    app.create_id(
        "/api/articles/",
        json!({
            "title": "Summit opens",
            "body": "",
            "published_at": "2020-01-01T00:00:00Z",
            "category_ids": [world],
        }),
    )
    .await;
    app.create_id("/api/articles/", json!({"title": "Draft piece", "body": ""}))
        .await;

    let (_, in_world) = app.get("/api/articles/?category=world").await;
    assert_eq!(in_world.as_array().unwrap().len(), 1);
    assert_eq!(in_world[0]["slug"], "summit-opens");
    assert_eq!(in_world[0]["status"], "published");

    let (_, drafts) = app.get("/api/articles/?status=draft").await;
    assert_eq!(drafts.as_array().unwrap().len(), 1);
    assert_eq!(drafts[0]["slug"], "draft-piece");

    let (status, body) = app.get("/api/articles/?status=archived").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "status");

    let (_, detail) = app.get("/api/articles/summit-opens").await;
    assert_eq!(detail["categories"][0]["slug"], "world");
    assert_eq!(detail["categories"][0]["name"], "World");
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = spawn_app().await;

    let id = app
        .create_id("/api/articles/", json!({"title": "Old", "slug": "old", "body": "x"}))
        .await;

    let (status, updated) = app
        .put(
            &format!("/api/articles/id/{}", id),
            json!({"title": "New", "slug": "new", "body": "y", "summary": "s"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], "new");
    assert_eq!(updated["summary"], "s");

    let (status, _) = app.get("/api/articles/old").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.delete(&format!("/api/articles/id/{}", id)).await, StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&format!("/api/articles/id/{}", id)).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validation_errors() {
    let app = spawn_app().await;

    let (status, body) = app
        .create("/api/articles/", json!({"title": "", "slug": "x", "body": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .create("/api/articles/", json!({"title": "Bad slug", "slug": "Bad Slug", "body": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "slug");

    let (status, _) = app
        .create(
            "/api/articles/",
            json!({"title": "Ghost", "body": "", "tag_ids": [uuid::Uuid::now_v7()]}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mutations_require_admin() {
    let app = spawn_app().await;
    let body = json!({"title": "A", "slug": "a", "body": "hello"});

    let (status, error) = app
        .json(Method::POST, "/api/articles/", None, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["code"], "UNAUTHORIZED");

    let (status, _) = app
        .json(Method::POST, "/api/articles/", Some("not-a-jwt"), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let viewer = app.token(Role::Viewer);
    let (status, error) = app
        .json(Method::POST, "/api/articles/", Some(&viewer), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["code"], "FORBIDDEN");

    let editor = app.token(Role::Editor);
    let (status, _) = app
        .json(Method::POST, "/api/articles/", Some(&editor), Some(body))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, list) = app.get("/api/articles/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_malformed_requests_get_json_errors() {
    let app = spawn_app().await;

    let (status, body) = app
        .create("/api/articles/", json!({"slug": "a", "body": "hello"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_FIELD");
    assert_eq!(body["field"], "title");

    let (status, body) = app
        .create("/api/articles/", json!({"title": 5, "body": "hello"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FORMAT");

    let (status, body) = app.get("/api/articles/?limit=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FORMAT");

    let (status, body) = app.get("/api/articles/id/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_FORMAT");
}
