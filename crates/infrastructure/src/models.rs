use aws_sdk_dynamodb::types::AttributeValue;
use domain::{Todo, TodoError, TodoId};
use std::collections::HashMap;

pub type Item = HashMap<String, AttributeValue>;

/// テーブルの属性名
pub mod attr {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const COMPLETED: &str = "completed";
}

/// Todo を DynamoDB アイテムに変換（completed 未指定なら属性ごと省く）
pub fn todo_to_item(todo: &Todo) -> Item {
    let mut item = HashMap::new();
    item.insert(attr::ID.to_string(), AttributeValue::S(todo.id.as_str().to_string()));
    item.insert(attr::NAME.to_string(), AttributeValue::S(todo.name.clone()));
    if let Some(completed) = todo.completed {
        item.insert(attr::COMPLETED.to_string(), AttributeValue::Bool(completed));
    }
    item
}

pub fn id_key(id: &TodoId) -> Item {
    HashMap::from([(attr::ID.to_string(), AttributeValue::S(id.as_str().to_string()))])
}

/// DynamoDB アイテムから Todo を復元
pub fn item_to_todo(item: &Item) -> Result<Todo, TodoError> {
    let id = item
        .get(attr::ID)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| malformed("id"))?;
    let name = item
        .get(attr::NAME)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| malformed("name"))?;
    let completed = match item.get(attr::COMPLETED) {
        None | Some(AttributeValue::Null(_)) => None,
        Some(value) => Some(*value.as_bool().map_err(|_| malformed("completed"))?),
    };

    Ok(Todo {
        name: name.clone(),
        completed,
        id: TodoId::parse(id).map_err(|_| malformed("id"))?,
    })
}

fn malformed(attribute: &str) -> TodoError {
    TodoError::Store(format!("stored item has a missing or malformed `{attribute}` attribute"))
}
