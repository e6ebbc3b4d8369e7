use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use domain::TodoError;
use shared::Config;
use std::time::Duration;
use tracing::{debug, info};

/// テーブルの作成完了を待つ間隔と回数
const TABLE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const TABLE_POLL_ATTEMPTS: u32 = 60;

#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
}

impl DynamoDbClient {
    /// エンドポイントが指定されている場合は DynamoDB Local 向けに静的な認証情報を使う
    pub async fn new(config: &Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()));

        if let Some(endpoint) = &config.dynamodb_endpoint {
            loader = loader
                .endpoint_url(endpoint)
                .credentials_provider(Credentials::new("local", "local", None, None, "todo-api"));
        }

        let aws_config = loader.load().await;

        Self {
            client: Client::new(&aws_config),
            table_name: config.dynamodb_table.clone(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// テーブルの存在を確認し、無ければ作成する
    ///
    /// 起動時に一度だけ呼ばれ、ここでの失敗はストアへの接続失敗として扱う。
    pub async fn ensure_table(&self) -> Result<(), TodoError> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => {
                debug!(table = %self.table_name, "table already exists");
                return Ok(());
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) => {}
            Err(err) => return Err(store_error(err)),
        }

        info!(table = %self.table_name, "creating table");

        let id_definition = AttributeDefinition::builder()
            .attribute_name("id")
            .attribute_type(ScalarAttributeType::S)
            .build()
            .map_err(|e| TodoError::Store(e.to_string()))?;
        let id_key = KeySchemaElement::builder()
            .attribute_name("id")
            .key_type(KeyType::Hash)
            .build()
            .map_err(|e| TodoError::Store(e.to_string()))?;

        self.client
            .create_table()
            .table_name(&self.table_name)
            .attribute_definitions(id_definition)
            .key_schema(id_key)
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .map_err(store_error)?;

        self.wait_until_active().await
    }

    async fn wait_until_active(&self) -> Result<(), TodoError> {
        for _ in 0..TABLE_POLL_ATTEMPTS {
            let output = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await
                .map_err(store_error)?;

            let status = output.table().and_then(|table| table.table_status());
            if status == Some(&TableStatus::Active) {
                info!(table = %self.table_name, "table is active");
                return Ok(());
            }

            tokio::time::sleep(TABLE_POLL_INTERVAL).await;
        }

        Err(TodoError::Store(format!(
            "table {} did not become active",
            self.table_name
        )))
    }
}

/// SDK のエラーを `TodoError::Store` に変換する（原因のチェーンをすべて含める）
pub fn store_error<E, R>(err: SdkError<E, R>) -> TodoError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    TodoError::Store(DisplayErrorContext(err).to_string())
}
