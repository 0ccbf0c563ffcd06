use std::sync::Arc;

use anyhow::Context;
use todo_web::adapters::TodoApp;
use todo_web::config::AppConfig;
use todo_web::storage::sqlite::SqliteStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let storage = SqliteStorage::new(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("could not open database {}", config.database_url))?;
    let app = TodoApp::new(Arc::new(storage), config.http).context("could not load templates")?;
    app.serve().await
}
