mod common;

use axum::http::StatusCode;
use common::*;
use domain::{TodoDraft, TodoId};
use infrastructure::TodoRepository;
use serde_json::json;

#[tokio::test]
async fn get_health_returns_ok() {
    let (app, _) = test_app();

    let response = send(&app, empty("GET", "/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn todo_lifecycle_scenario() {
    let (app, _) = test_app();

    // 作成
    let response = send(&app, json("POST", "/api/todos", json!({"name": "buy milk"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["name"], "buy milk");
    assert_eq!(created["completed"], false);
    let id = created["id"].as_str().unwrap().to_string();

    // 取得
    let response = send(&app, empty("GET", &format!("/api/todos/{id}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    // 完了にする
    let response = send(
        &app,
        json("PATCH", &format!("/api/todos/{id}"), json!({"completed": true})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["id"], id.as_str());

    // 削除
    let response = send(&app, empty("DELETE", &format!("/api/todos/{id}"))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    // 削除後は 404
    let response = send(&app, empty("GET", &format!("/api/todos/{id}"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["status"], "error");
}

#[tokio::test]
async fn post_without_name_returns_400_and_creates_nothing() {
    let (app, repo) = test_app();

    let response = send(&app, json("POST", "/api/todos", json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({"status": "error", "message": "Missing `name` field"}));

    let response = send(&app, json("POST", "/api/todos", json!({"name": ""}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, empty("POST", "/api/todos")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, json("POST", "/api/todos", json!({"name": 0}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Missing `name` field");

    assert!(repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn post_ignores_supplied_completed() {
    let (app, _) = test_app();

    let response = send(
        &app,
        json("POST", "/api/todos", json!({"name": "x", "completed": true})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["completed"], false);
}

#[tokio::test]
async fn post_accepts_form_body() {
    let (app, repo) = test_app();

    let response = send(&app, form("POST", "/api/todos", "name=walk+the+dog")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let todos = repo.find_all().await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].name, "walk the dog");
    assert_eq!(todos[0].completed, Some(false));
}

#[tokio::test]
async fn post_with_malformed_json_returns_400() {
    let (app, _) = test_app();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/todos")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], "error");
}

#[tokio::test]
async fn list_returns_all_todos() {
    let (app, repo) = test_app();

    let response = send(&app, empty("GET", "/api/todos")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    for name in ["A", "B"] {
        repo.create(TodoDraft::named(name)).await.unwrap();
    }

    let response = send(&app, empty("GET", "/api/todos")).await;
    let list = body_json(response).await;
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|todo| todo["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["A", "B"]);
}

#[tokio::test]
async fn get_unknown_or_malformed_id_returns_404() {
    let (app, _) = test_app();

    let response = send(&app, empty("GET", &format!("/api/todos/{}", TodoId::new()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, empty("GET", "/api/todos/not-an-id")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["status"], "error");
}

#[tokio::test]
async fn patch_accepts_explicit_false() {
    let (app, repo) = test_app();
    let todo = repo.create(TodoDraft::named("toggle me")).await.unwrap();
    repo.update_completed(&todo.id, true).await.unwrap();

    let response = send(
        &app,
        json("PATCH", &format!("/api/todos/{}", todo.id), json!({"completed": false})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["completed"], false);
    assert_eq!(repo.find_by_id(&todo.id).await.unwrap().completed, Some(false));
}

#[tokio::test]
async fn patch_without_completed_returns_400() {
    let (app, repo) = test_app();
    let todo = repo.create(TodoDraft::named("untouched")).await.unwrap();

    for body in [json!({}), json!({"completed": null}), json!({"name": "renamed"})] {
        let response = send(&app, json("PATCH", &format!("/api/todos/{}", todo.id), body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Missing `completed` field"
        );
    }

    assert_eq!(repo.find_by_id(&todo.id).await.unwrap(), todo);
}

#[tokio::test]
async fn patch_with_non_boolean_completed_returns_400() {
    let (app, repo) = test_app();
    let todo = repo.create(TodoDraft::named("strict")).await.unwrap();

    let response = send(
        &app,
        json("PATCH", &format!("/api/todos/{}", todo.id), json!({"completed": "maybe"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(repo.find_by_id(&todo.id).await.unwrap().completed, Some(false));
}

#[tokio::test]
async fn patch_accepts_form_body() {
    let (app, repo) = test_app();
    let todo = repo.create(TodoDraft::named("form patch")).await.unwrap();

    let response = send(
        &app,
        form("PATCH", &format!("/api/todos/{}", todo.id), "completed=true"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(repo.find_by_id(&todo.id).await.unwrap().completed, Some(true));
}

#[tokio::test]
async fn patch_unknown_id_returns_404() {
    let (app, _) = test_app();

    let response = send(
        &app,
        json("PATCH", &format!("/api/todos/{}", TodoId::new()), json!({"completed": true})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_id_returns_404() {
    let (app, _) = test_app();

    let response = send(&app, empty("DELETE", &format!("/api/todos/{}", TodoId::new()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, empty("DELETE", "/api/todos/garbage")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let (app, _) = test_app();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/todos")
        .header("origin", "http://example.com")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response
        .headers()
        .get("access-control-allow-origin")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(allowed == "*" || allowed == "http://example.com");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let (app, _) = test_app();

    let response = send(&app, empty("GET", "/health")).await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unmatched_get_renders_invalid_page() {
    let (app, _) = test_app();

    let response = send(&app, empty("GET", "/no/such/page")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<h1>Invalid Page</h1>");
}

#[tokio::test]
async fn unmatched_post_returns_404_json() {
    let (app, _) = test_app();

    let response = send(&app, json("POST", "/no/such/page", json!({"name": "x"}))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["status"], "error");
}
