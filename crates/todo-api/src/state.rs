use crate::views::Views;
use infrastructure::{InMemoryTodoRepository, TodoRepository};
use std::path::PathBuf;
use std::sync::Arc;

/// アプリケーションの共有状態
///
/// 起動時に一度だけ組み立て、各ハンドラへ注入する。
pub struct AppState<R> {
    pub repo: Arc<R>,
    pub views: Arc<Views>,
    /// 静的ファイルの配信元
    pub public_dir: PathBuf,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            views: Arc::clone(&self.views),
            public_dir: self.public_dir.clone(),
        }
    }
}

impl<R: TodoRepository> AppState<R> {
    pub fn new(repo: R, views: Views, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo: Arc::new(repo),
            views: Arc::new(views),
            public_dir: public_dir.into(),
        }
    }
}

impl AppState<InMemoryTodoRepository> {
    /// InMemory ストアで組み立てる（開発/テスト用）
    pub fn in_memory() -> Result<Self, minijinja::Error> {
        Ok(Self::new(InMemoryTodoRepository::new(), Views::new()?, "public"))
    }
}
