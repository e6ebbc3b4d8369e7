//! 書き込み系ルートが受け取る生の入力
//!
//! JSON と URL エンコードされたフォームの両方を受け付けるため、
//! フィールドは `serde_json::Value` のまま受け取り、ここで型に寄せる。

use crate::errors::TodoError;
use crate::todo::TodoDraft;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoInput {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub completed: Option<Value>,
}

impl TodoInput {
    /// `name` を取り出す。未指定・null・空文字・0・false は `None`
    pub fn name(&self) -> Result<Option<String>, TodoError> {
        match &self.name {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(TodoError::Validation(
                "`name` must be a string".to_string(),
            )),
        }
    }

    /// `completed` を取り出す。未指定・null は `None`
    pub fn completed(&self) -> Result<Option<bool>, TodoError> {
        match &self.completed {
            None | Some(Value::Null) => Ok(None),
            Some(value) => coerce_bool(value).map(Some).ok_or_else(|| {
                TodoError::Validation("`completed` must be a boolean".to_string())
            }),
        }
    }

    /// フォーム由来の入力をそのまま下書きにする（存在チェックはしない）
    pub fn into_draft(self) -> Result<TodoDraft, TodoError> {
        Ok(TodoDraft {
            name: self.name()?,
            completed: self.completed()?,
        })
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
