#![allow(dead_code)]

use axum::{
    body::{self, Body},
    http::{header, Request, Response},
    Router,
};
use domain::{Todo, TodoDraft, TodoError, TodoId};
use infrastructure::{InMemoryTodoRepository, TodoRepository};
use serde_json::Value;
use std::sync::Arc;
use todo_api::{app_with_state, AppState, Views};
use tower::ServiceExt; // for `oneshot`

/// InMemory ストアを注入したルータと、そのストアへの参照
pub fn test_app() -> (Router, Arc<InMemoryTodoRepository>) {
    let state = AppState::in_memory().unwrap();
    let repo = state.repo.clone();
    (app_with_state(state), repo)
}

/// すべての操作がストアエラーで失敗するリポジトリ
pub struct UnavailableTodoRepository;

fn store_down() -> TodoError {
    TodoError::Store("connection refused".to_string())
}

impl TodoRepository for UnavailableTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, TodoError> {
        Err(store_down())
    }

    async fn find_by_id(&self, _id: &TodoId) -> Result<Todo, TodoError> {
        Err(store_down())
    }

    async fn create(&self, _draft: TodoDraft) -> Result<Todo, TodoError> {
        Err(store_down())
    }

    async fn update_completed(&self, _id: &TodoId, _completed: bool) -> Result<Todo, TodoError> {
        Err(store_down())
    }

    async fn delete_by_id(&self, _id: &TodoId) -> Result<(), TodoError> {
        Err(store_down())
    }

    async fn delete_all(&self) -> Result<usize, TodoError> {
        Err(store_down())
    }
}

/// ストアに到達できない状態のルータ
pub fn unavailable_app() -> Router {
    let state = AppState::new(UnavailableTodoRepository, Views::new().unwrap(), "public");
    app_with_state(state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
