use crate::error::ApiError;
use crate::extract::JsonOrForm;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::{Todo, TodoDraft, TodoError, TodoId, TodoInput};
use infrastructure::TodoRepository;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    status: &'static str,
}

/// ヘルスチェック
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// GET /api/todos
pub async fn list_todos<R: TodoRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.repo.find_all().await?;
    info!(count = todos.len(), "GET /api/todos - returning list of todos");
    Ok(Json(todos))
}

/// GET /api/todos/:id
///
/// 形式の不正な id も存在しない id と同じく 404 を返す。ストアのエラーも 404。
pub async fn get_todo<R: TodoRepository>(
    Path(id): Path<String>,
    State(state): State<AppState<R>>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::parse(&id)?;
    let todo = state.repo.find_by_id(&id).await.map_err(ApiError::by_id)?;
    info!(todo_id = %id, "GET /api/todos/:id - returning todo");
    Ok(Json(todo))
}

/// POST /api/todos
///
/// `completed` は入力に関わらず false で作成する。
pub async fn create_todo<R: TodoRepository>(
    State(state): State<AppState<R>>,
    JsonOrForm(input): JsonOrForm<TodoInput>,
) -> Result<Json<Todo>, ApiError> {
    let name = input.name()?.ok_or_else(|| TodoError::missing_field("name"))?;
    let todo = state.repo.create(TodoDraft::named(name)).await?;
    info!(todo_id = %todo.id, "POST /api/todos - created new todo");
    Ok(Json(todo))
}

/// PATCH /api/todos/:id
///
/// `completed` は「存在するか」で判定する（`false` も有効な値）。
pub async fn update_todo<R: TodoRepository>(
    Path(id): Path<String>,
    State(state): State<AppState<R>>,
    JsonOrForm(input): JsonOrForm<TodoInput>,
) -> Result<Json<Todo>, ApiError> {
    let completed = input
        .completed()?
        .ok_or_else(|| TodoError::missing_field("completed"))?;
    let id = TodoId::parse(&id)?;

    let todo = state
        .repo
        .update_completed(&id, completed)
        .await
        .map_err(ApiError::by_id)?;
    info!(todo_id = %id, completed, "PATCH /api/todos/:id - todo updated");
    Ok(Json(todo))
}

/// DELETE /api/todos/:id
pub async fn delete_todo<R: TodoRepository>(
    Path(id): Path<String>,
    State(state): State<AppState<R>>,
) -> Result<StatusCode, ApiError> {
    let id = TodoId::parse(&id)?;
    state.repo.delete_by_id(&id).await.map_err(ApiError::by_id)?;
    info!(todo_id = %id, "DELETE /api/todos/:id - todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
