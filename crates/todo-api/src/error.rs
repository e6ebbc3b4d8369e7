use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::TodoError;
use serde::Serialize;
use thiserror::Error;

/// API クライアントへ返すエラー
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

/// `{"status": "error", "message": ...}`
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    message: &'a str,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// id を指定するルート用の変換
    ///
    /// 対象の読み書きに失敗した場合は、ストアのエラーも含めて 404 として返す。
    pub fn by_id(e: TodoError) -> Self {
        match e {
            TodoError::Store(_) => ApiError::NotFound(e.to_string()),
            other => other.into(),
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(e: TodoError) -> Self {
        match e {
            TodoError::Validation(msg) => ApiError::BadRequest(msg),
            TodoError::NotFound(_) | TodoError::InvalidId(_) => ApiError::NotFound(e.to_string()),
            TodoError::Store(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        // リクエストスパン（method / uri）の中で記録される
        tracing::error!(status = status.as_u16(), message = %message, "request failed");

        let body = ErrorBody {
            status: "error",
            message: &message,
        };
        (status, Json(body)).into_response()
    }
}
