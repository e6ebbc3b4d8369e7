use domain::TodoError;
use shared::Config;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// ストア呼び出しのリトライ設定
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            backoff_multiplier: 2.0,
            max_delay_ms: 5000,
        }
    }
}

impl From<&Config> for RetryConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_attempts: config.retry_max_attempts.max(1),
            initial_delay_ms: config.retry_initial_delay_ms,
            ..Self::default()
        }
    }
}

/// 指数バックオフによるリトライ実行
/// `is_retryable` が true を返すエラーのみ再試行する
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation: F,
    config: &RetryConfig,
    is_retryable: impl Fn(&E) -> bool,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "store operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) => {
                if attempt >= config.max_attempts || !is_retryable(&error) {
                    return Err(error);
                }

                warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = delay,
                    error = %error,
                    "retryable store error, backing off"
                );

                sleep(Duration::from_millis(delay)).await;

                delay = ((delay as f64) * config.backoff_multiplier) as u64;
                delay = delay.min(config.max_delay_ms);
            }
        }
    }
}

/// DynamoDB 操作用のリトライヘルパー
pub async fn retry_store_operation<F, Fut, T>(operation: F, config: &RetryConfig) -> Result<T, TodoError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, TodoError>>,
{
    retry_with_backoff(operation, config, |error| {
        matches!(error, TodoError::Store(msg) if is_dynamodb_retryable(msg))
    })
    .await
}

/// 条件付き書き込み用のリトライヘルパー
///
/// 500 系で失敗した書き込みは適用済みのことがある。再試行した呼び出しが
/// 条件チェックで失敗した場合は、前の試行で適用されたとみなして成功を返す。
pub async fn retry_conditional_write<F, Fut, T>(
    operation: F,
    config: &RetryConfig,
    condition_failed: impl Fn(&TodoError) -> bool,
) -> Result<(), TodoError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, TodoError>>,
{
    let attempts = AtomicU32::new(0);

    let result = retry_store_operation(
        || {
            attempts.fetch_add(1, Ordering::Relaxed);
            operation()
        },
        config,
    )
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(error) if attempts.load(Ordering::Relaxed) > 1 && condition_failed(&error) => {
            debug!(error = %error, "condition failed on retry, earlier attempt was applied");
            Ok(())
        }
        Err(error) => Err(error),
    }
}

/// 条件チェック失敗（ConditionalCheckFailedException）かどうかを判定
pub fn is_condition_check_failure(error_message: &str) -> bool {
    error_message.contains("ConditionalCheckFailed")
}

/// 一時的な DynamoDB エラーかどうかを判定
pub fn is_dynamodb_retryable(error_message: &str) -> bool {
    const RETRYABLE: [&str; 6] = [
        "ThrottlingException",
        "ProvisionedThroughputExceededException",
        "RequestLimitExceeded",
        "ServiceUnavailable",
        "InternalServerError",
        "dispatch failure",
    ];

    RETRYABLE.iter().any(|code| error_message.contains(code))
}
