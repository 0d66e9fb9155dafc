//! Todo Server - the remote todo collection.
//!
//! Serves the collection over HTTP and pushes every change to open live
//! queries over WebSocket. Records live in PostgreSQL, or in memory when no
//! database is configured.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod websocket;

use crate::db::TodoRepository;
use crate::websocket::SubscriptionManager;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TodoRepository>,
    pub subscriptions: Arc<SubscriptionManager>,
    /// Serializes collection reads that end up on live queries
    pub publish_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self {
            repo,
            subscriptions: SubscriptionManager::new_shared(),
            publish_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the application on `listener` until the server stops.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, app(state)).await
}
