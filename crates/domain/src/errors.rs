use thiserror::Error;

/// Todo 操作で発生するエラー
///
/// HTTP 層ではそれぞれ次のステータスに対応する:
/// `Validation` → 400、`NotFound` / `InvalidId` → 404、`Store` → 500
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("{0}")]
    Validation(String),

    #[error("No todo found with id {0}")]
    NotFound(String),

    #[error("Invalid todo id: {0}")]
    InvalidId(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl TodoError {
    pub fn missing_field(field: &str) -> Self {
        TodoError::Validation(format!("Missing `{field}` field"))
    }
}
