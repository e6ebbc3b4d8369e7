//! サーバーサイドでレンダリングする HTML
//!
//! テンプレートは `templates/` に置き、文字列定数として埋め込む。

use domain::Todo;
use minijinja::{context, Environment};
use serde::Serialize;

pub const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// 未定義パスへの GET に返す断片
pub const INVALID_PAGE: &str = "<h1>Invalid Page</h1>";

/// ストアの読み込みに失敗したときに返す断片
pub const UNAVAILABLE_PAGE: &str = "<h1>Something went wrong</h1>";

/// テンプレートに渡す 1 行分
#[derive(Debug, Serialize)]
struct TodoRow<'a> {
    id: &'a str,
    name: &'a str,
    completed: bool,
}

impl<'a> From<&'a Todo> for TodoRow<'a> {
    fn from(todo: &'a Todo) -> Self {
        Self {
            id: todo.id.as_str(),
            name: &todo.name,
            completed: todo.is_completed(),
        }
    }
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    /// 一覧ページ（空の一覧も通常どおり描画する）
    pub fn render_index(&self, todos: &[Todo]) -> Result<String, minijinja::Error> {
        let rows: Vec<TodoRow> = todos.iter().map(TodoRow::from).collect();
        let remaining = rows.iter().filter(|row| !row.completed).count();

        self.env
            .get_template("index.html")?
            .render(context! { todo_list => rows, remaining => remaining })
    }
}
