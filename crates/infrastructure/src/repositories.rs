use crate::dynamodb::{store_error, DynamoDbClient};
use crate::models::{attr, id_key, item_to_todo, todo_to_item, Item};
use crate::retry::{
    is_condition_check_failure, retry_conditional_write, retry_store_operation, RetryConfig,
};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, ReturnValue, WriteRequest};
use domain::{Todo, TodoDraft, TodoError, TodoId};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// BatchWriteItem の 1 リクエストあたりの上限
const BATCH_WRITE_LIMIT: usize = 25;

/// Todo コレクションへの永続化操作
///
/// 実装はプロセス全体で共有されるため `Send + Sync` を要求する。
pub trait TodoRepository: Send + Sync + 'static {
    /// 全件取得（順序はストアに依存）
    fn find_all(&self) -> impl Future<Output = Result<Vec<Todo>, TodoError>> + Send;

    fn find_by_id(&self, id: &TodoId) -> impl Future<Output = Result<Todo, TodoError>> + Send;

    /// id を払い出して保存する。name が無ければ `TodoError::Validation`
    fn create(&self, draft: TodoDraft) -> impl Future<Output = Result<Todo, TodoError>> + Send;

    /// completed のみを更新し、更新後の Todo を返す
    fn update_completed(
        &self,
        id: &TodoId,
        completed: bool,
    ) -> impl Future<Output = Result<Todo, TodoError>> + Send;

    /// 存在しない id は `TodoError::NotFound`
    fn delete_by_id(&self, id: &TodoId) -> impl Future<Output = Result<(), TodoError>> + Send;

    /// 全件削除し、削除件数を返す
    fn delete_all(&self) -> impl Future<Output = Result<usize, TodoError>> + Send;
}

/// DynamoDB の単一テーブル（ハッシュキー `id`）に保存するリポジトリ
#[derive(Clone)]
pub struct DynamoTodoRepository {
    db: DynamoDbClient,
    retry: RetryConfig,
}

impl DynamoTodoRepository {
    pub fn new(db: DynamoDbClient, retry: RetryConfig) -> Self {
        Self { db, retry }
    }

    /// テーブルを全走査する（ページングを最後まで辿る）
    async fn scan_items(&self, keys_only: bool) -> Result<Vec<Item>, TodoError> {
        let client = self.db.client();
        let table = self.db.table_name();
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let exclusive_start = start_key.take();
            let exclusive_start = &exclusive_start;

            let output = retry_store_operation(
                || async move {
                    let mut scan = client
                        .scan()
                        .table_name(table)
                        .set_exclusive_start_key(exclusive_start.clone());
                    if keys_only {
                        scan = scan
                            .projection_expression("#id")
                            .expression_attribute_names("#id", attr::ID);
                    }
                    scan.send().await.map_err(store_error)
                },
                &self.retry,
            )
            .await?;

            items.extend(output.items().iter().cloned());

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(items)
    }

    /// 未処理分が無くなるまで削除リクエストを送り直す
    async fn batch_delete(&self, requests: Vec<WriteRequest>) -> Result<(), TodoError> {
        let client = self.db.client();
        let table = self.db.table_name();
        let mut pending = requests;
        let mut delay = Duration::from_millis(self.retry.initial_delay_ms.max(1));

        for attempt in 1..=batch_rounds(&self.retry) {
            let batch = &pending;
            let output = retry_store_operation(
                || async move {
                    client
                        .batch_write_item()
                        .request_items(table, batch.clone())
                        .send()
                        .await
                        .map_err(store_error)
                },
                &self.retry,
            )
            .await?;

            pending = output
                .unprocessed_items()
                .and_then(|unprocessed| unprocessed.get(table))
                .cloned()
                .unwrap_or_default();

            if pending.is_empty() {
                return Ok(());
            }

            warn!(attempt, unprocessed = pending.len(), "batch delete left unprocessed items");
            tokio::time::sleep(delay).await;
            delay = delay.saturating_mul(2);
        }

        Err(TodoError::Store(format!(
            "{} delete requests were left unprocessed",
            pending.len()
        )))
    }
}

/// 未処理アイテムの再送回数の上限（リトライ回数の 2 倍）
fn batch_rounds(retry: &RetryConfig) -> u32 {
    retry.max_attempts.max(1).saturating_mul(2)
}

/// 条件付き書き込みの失敗（対象が存在しない）を NotFound に読み替える
fn not_found_on_condition<E, R>(
    err: SdkError<E, R>,
    id: &TodoId,
    condition_failed: impl Fn(&E) -> bool,
) -> TodoError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if err.as_service_error().is_some_and(condition_failed) {
        TodoError::NotFound(id.to_string())
    } else {
        store_error(err)
    }
}

impl TodoRepository for DynamoTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, TodoError> {
        let items = self.scan_items(false).await?;
        let todos = items.iter().map(item_to_todo).collect::<Result<Vec<_>, _>>()?;

        debug!(count = todos.len(), "scanned todos");
        Ok(todos)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Todo, TodoError> {
        let client = self.db.client();
        let table = self.db.table_name();

        let output = retry_store_operation(
            || async move {
                client
                    .get_item()
                    .table_name(table)
                    .set_key(Some(id_key(id)))
                    .send()
                    .await
                    .map_err(store_error)
            },
            &self.retry,
        )
        .await?;

        match output.item() {
            Some(item) => item_to_todo(item),
            None => Err(TodoError::NotFound(id.to_string())),
        }
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo, TodoError> {
        let client = self.db.client();
        let table = self.db.table_name();
        let todo = draft.into_todo(TodoId::new())?;
        let item = &todo_to_item(&todo);

        retry_conditional_write(
            || async move {
                client
                    .put_item()
                    .table_name(table)
                    .set_item(Some(item.clone()))
                    .condition_expression("attribute_not_exists(#id)")
                    .expression_attribute_names("#id", attr::ID)
                    .send()
                    .await
                    .map_err(store_error)
            },
            &self.retry,
            |error| matches!(error, TodoError::Store(msg) if is_condition_check_failure(msg)),
        )
        .await?;

        info!(todo_id = %todo.id, name = %todo.name, "inserted todo");
        Ok(todo)
    }

    async fn update_completed(&self, id: &TodoId, completed: bool) -> Result<Todo, TodoError> {
        let client = self.db.client();
        let table = self.db.table_name();

        let output = retry_store_operation(
            || async move {
                client
                    .update_item()
                    .table_name(table)
                    .set_key(Some(id_key(id)))
                    .update_expression("SET #completed = :completed")
                    .condition_expression("attribute_exists(#id)")
                    .expression_attribute_names("#id", attr::ID)
                    .expression_attribute_names("#completed", attr::COMPLETED)
                    .expression_attribute_values(":completed", AttributeValue::Bool(completed))
                    .return_values(ReturnValue::AllNew)
                    .send()
                    .await
                    .map_err(|err| {
                        not_found_on_condition(err, id, |e| e.is_conditional_check_failed_exception())
                    })
            },
            &self.retry,
        )
        .await?;

        let attributes = output
            .attributes()
            .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
        item_to_todo(attributes)
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<(), TodoError> {
        let client = self.db.client();
        let table = self.db.table_name();

        retry_conditional_write(
            || async move {
                client
                    .delete_item()
                    .table_name(table)
                    .set_key(Some(id_key(id)))
                    .condition_expression("attribute_exists(#id)")
                    .expression_attribute_names("#id", attr::ID)
                    .send()
                    .await
                    .map_err(|err| {
                        not_found_on_condition(err, id, |e| e.is_conditional_check_failed_exception())
                    })
            },
            &self.retry,
            |error| matches!(error, TodoError::NotFound(_)),
        )
        .await?;

        info!(todo_id = %id, "deleted todo");
        Ok(())
    }

    async fn delete_all(&self) -> Result<usize, TodoError> {
        let keys = self.scan_items(true).await?;
        let total = keys.len();

        let requests = keys
            .into_iter()
            .map(|key| {
                let delete = DeleteRequest::builder()
                    .set_key(Some(key))
                    .build()
                    .map_err(|e| TodoError::Store(e.to_string()))?;
                Ok(WriteRequest::builder().delete_request(delete).build())
            })
            .collect::<Result<Vec<_>, TodoError>>()?;

        for chunk in requests.chunks(BATCH_WRITE_LIMIT) {
            self.batch_delete(chunk.to_vec()).await?;
        }

        info!(count = total, "deleted all todos");
        Ok(total)
    }
}

/// プロセス内だけで完結するリポジトリ（開発/テスト用）
///
/// 挿入順を保持するため Vec で管理する。
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: std::sync::Mutex<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_todos<T>(&self, f: impl FnOnce(&mut Vec<Todo>) -> Result<T, TodoError>) -> Result<T, TodoError> {
        let mut todos = self
            .todos
            .lock()
            .map_err(|_| TodoError::Store("in-memory store lock poisoned".to_string()))?;
        f(&mut todos)
    }
}

impl TodoRepository for InMemoryTodoRepository {
    async fn find_all(&self) -> Result<Vec<Todo>, TodoError> {
        self.with_todos(|todos| Ok(todos.clone()))
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Todo, TodoError> {
        self.with_todos(|todos| {
            todos
                .iter()
                .find(|todo| &todo.id == id)
                .cloned()
                .ok_or_else(|| TodoError::NotFound(id.to_string()))
        })
    }

    async fn create(&self, draft: TodoDraft) -> Result<Todo, TodoError> {
        let todo = draft.into_todo(TodoId::new())?;
        self.with_todos(|todos| {
            todos.push(todo.clone());
            Ok(todo)
        })
    }

    async fn update_completed(&self, id: &TodoId, completed: bool) -> Result<Todo, TodoError> {
        self.with_todos(|todos| {
            let todo = todos
                .iter_mut()
                .find(|todo| &todo.id == id)
                .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
            todo.completed = Some(completed);
            Ok(todo.clone())
        })
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<(), TodoError> {
        self.with_todos(|todos| {
            let index = todos
                .iter()
                .position(|todo| &todo.id == id)
                .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
            todos.remove(index);
            Ok(())
        })
    }

    async fn delete_all(&self) -> Result<usize, TodoError> {
        self.with_todos(|todos| {
            let count = todos.len();
            todos.clear();
            Ok(count)
        })
    }
}
