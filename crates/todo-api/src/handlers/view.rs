use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{INVALID_PAGE, UNAVAILABLE_PAGE};
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
};
use infrastructure::TodoRepository;
use tracing::error;

/// GET /
pub async fn index<R: TodoRepository>(State(state): State<AppState<R>>) -> Response {
    let todos = match state.repo.find_all().await {
        Ok(todos) => todos,
        Err(e) => {
            error!(error = %e, "GET / - failed to load todos");
            return (StatusCode::INTERNAL_SERVER_ERROR, Html(UNAVAILABLE_PAGE)).into_response();
        }
    };

    match state.views.render_index(&todos) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!(error = %e, "GET / - failed to render index");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(UNAVAILABLE_PAGE)).into_response()
        }
    }
}

/// ルートにも静的ファイルにも一致しなかったリクエスト
///
/// GET は 200 で "Invalid Page" を返す（従来の挙動に合わせている）。
pub async fn unmatched(method: Method) -> Response {
    if method == Method::GET || method == Method::HEAD {
        Html(INVALID_PAGE).into_response()
    } else {
        ApiError::NotFound(format!("Cannot {method} this path")).into_response()
    }
}
