//! フォーム送信用の互換ルート
//!
//! いずれも失敗をログに残すだけで、レスポンスは常に `/` へのリダイレクト。
//! `GET /delete/:id` は副作用を持つ GET なので REST 側とは分けている。

use crate::extract::JsonOrForm;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
};
use domain::{TodoId, TodoInput};
use infrastructure::TodoRepository;
use tracing::{error, info};

/// 302 Found で一覧ページへ戻す
fn back_to_index() -> Response {
    (StatusCode::FOUND, [(LOCATION, "/")]).into_response()
}

/// POST /newtodo
pub async fn new_todo<R: TodoRepository>(
    State(state): State<AppState<R>>,
    JsonOrForm(input): JsonOrForm<TodoInput>,
) -> Response {
    let result = match input.into_draft() {
        Ok(draft) => state.repo.create(draft).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(todo) => info!(todo_id = %todo.id, name = %todo.name, "POST /newtodo - inserted todo"),
        Err(e) => error!(error = %e, "POST /newtodo - failed to insert todo"),
    }

    back_to_index()
}

/// GET /delete/:id
pub async fn delete_todo<R: TodoRepository>(
    Path(id): Path<String>,
    State(state): State<AppState<R>>,
) -> Response {
    let result = match TodoId::parse(&id) {
        Ok(id) => state.repo.delete_by_id(&id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => info!(todo_id = %id, "GET /delete/:id - todo deleted"),
        Err(e) => error!(todo_id = %id, error = %e, "GET /delete/:id - failed to delete todo"),
    }

    back_to_index()
}

/// POST /delAlltodo
pub async fn delete_all<R: TodoRepository>(State(state): State<AppState<R>>) -> Response {
    match state.repo.delete_all().await {
        Ok(count) => info!(count, "POST /delAlltodo - deleted all todos"),
        Err(e) => error!(error = %e, "POST /delAlltodo - failed to delete todos"),
    }

    back_to_index()
}
