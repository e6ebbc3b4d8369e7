use crate::errors::TodoError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ストアが払い出す Todo の識別子（ULID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// 外部から受け取った文字列を検証して TodoId に変換する
    ///
    /// 大文字小文字は区別せず、正規化した表現で保持する。
    pub fn parse(id: &str) -> Result<Self, TodoError> {
        ulid::Ulid::from_string(id)
            .map(|ulid| Self(ulid.to_string()))
            .map_err(|_| TodoError::InvalidId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub name: String,
    /// フォーム経由の作成では未指定のまま保存されうる
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    pub id: TodoId,
}

impl Todo {
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

/// 作成前の Todo（id 未割り当て）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub name: Option<String>,
    pub completed: Option<bool>,
}

impl TodoDraft {
    /// API 経由の作成: completed は常に false
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            completed: Some(false),
        }
    }

    /// 払い出された id を割り当てて Todo を確定する
    pub fn into_todo(self, id: TodoId) -> Result<Todo, TodoError> {
        let name = self
            .name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| TodoError::missing_field("name"))?;

        Ok(Todo {
            name,
            completed: self.completed,
            id,
        })
    }
}
