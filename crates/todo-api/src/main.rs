//! todo-api バイナリのエントリポイント

use anyhow::Context;
use infrastructure::{DynamoDbClient, DynamoTodoRepository, RetryConfig};
use shared::{init_tracing, Config};
use todo_api::{app_with_state, AppState, Views};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format)
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {e}"))?;

    tracing::info!(
        table = %config.dynamodb_table,
        endpoint = config.dynamodb_endpoint.as_deref().unwrap_or("aws"),
        "connecting to document store"
    );

    // ストアに到達できなければ起動しない
    let db = DynamoDbClient::new(&config).await;
    db.ensure_table()
        .await
        .context("failed to connect to the document store")?;

    let repo = DynamoTodoRepository::new(db, RetryConfig::from(&config));
    let views = Views::new().context("failed to load templates")?;
    let state = AppState::new(repo, views, config.public_dir.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        %addr,
        "server started - make REST API calls to http://localhost:{}/api/todos",
        config.port
    );

    axum::serve(listener, app_with_state(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Ctrl+C または SIGTERM を待つ
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
