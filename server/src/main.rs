//! `todo-server` binary.

use std::sync::Arc;
use todo_server::config::Config;
use todo_server::db::{MemoryTodoRepository, PgTodoRepository, TodoRepository};
use todo_server::{serve, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Todo Server on {}:{}", config.host, config.port);

    let repo: Arc<dyn TodoRepository> = match &config.database_url {
        Some(url) => Arc::new(PgTodoRepository::connect(url).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, keeping todos in memory");
            Arc::new(MemoryTodoRepository::new())
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    serve(listener, AppState::new(repo)).await?;

    Ok(())
}
