use std::sync::Arc;

use todo_api::{
    application::{show_service::PlainShowService, todo_service::TodoServiceImpl},
    config::{Config, StoreConfig},
    domain::repository::TodoRepository,
    http::routing::{self, todos},
    infrastructure::{memory_repo::InMemoryTodoRepository, sqlite_repo::SqliteTodoRepository},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    match &config.store {
        StoreConfig::Memory => {
            tracing::info!("using in-memory store");
            serve(&config, InMemoryTodoRepository::new()).await
        }
        StoreConfig::Sqlite(url) => {
            tracing::info!(database_url = %url, "using sqlite store");
            serve(&config, SqliteTodoRepository::connect(url).await?).await
        }
    }
}

async fn serve<R: TodoRepository + Clone>(config: &Config, repo: R) -> anyhow::Result<()> {
    repo.init().await?;
    let service = TodoServiceImpl::new(repo);
    let todos_router = todos::router(todos::AppState { service, show: Arc::new(PlainShowService) });
    let router = routing::app(todos_router);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
