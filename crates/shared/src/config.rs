use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// ローカルの DynamoDB（DynamoDB Local）
pub const DEFAULT_DYNAMODB_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_DYNAMODB_TABLE: &str = "Todo";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// ログの出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub dynamodb_table: String,
    /// `None` の場合は通常の AWS エンドポイント解決に任せる
    pub dynamodb_endpoint: Option<String>,
    pub aws_region: String,
    pub retry_max_attempts: u32,
    pub retry_initial_delay_ms: u64,
    pub public_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            dynamodb_table: DEFAULT_DYNAMODB_TABLE.to_string(),
            dynamodb_endpoint: Some(DEFAULT_DYNAMODB_ENDPOINT.to_string()),
            aws_region: "ap-northeast-1".to_string(),
            retry_max_attempts: 3,
            retry_initial_delay_ms: 100,
            public_dir: PathBuf::from("public"),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を組み立てる（テスト用に環境変数を差し替えられる）
    ///
    /// `DYNAMODB_ENDPOINT` を空文字で指定すると、エンドポイントの上書きを無効にする。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            host: parse_or("HOST", &lookup, defaults.host)?,
            port: parse_or("PORT", &lookup, defaults.port)?,
            dynamodb_table: lookup("DYNAMODB_TABLE").unwrap_or(defaults.dynamodb_table),
            dynamodb_endpoint: match lookup("DYNAMODB_ENDPOINT") {
                Some(endpoint) if endpoint.trim().is_empty() => None,
                Some(endpoint) => Some(endpoint),
                None => defaults.dynamodb_endpoint,
            },
            aws_region: lookup("AWS_REGION").unwrap_or(defaults.aws_region),
            retry_max_attempts: parse_or("RETRY_MAX_ATTEMPTS", &lookup, defaults.retry_max_attempts)?,
            retry_initial_delay_ms: parse_or(
                "RETRY_INITIAL_DELAY_MS",
                &lookup,
                defaults.retry_initial_delay_ms,
            )?,
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            log_format: parse_or("LOG_FORMAT", &lookup, defaults.log_format)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
