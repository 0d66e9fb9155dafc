//! Remote store - the server-backed adapter.
//!
//! Mutations are single calls to the [`RemoteBackend`] and resolve once the
//! server has acknowledged them. The collection itself is never patched
//! locally: a background task holds the live query open and republishes
//! whatever the server pushes, so every consumer sees server order and
//! server-assigned ids.

use super::{TodoState, TodoStore};
use crate::error::Result;
use crate::remote::RemoteBackend;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use todo_engine::clean_text;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Pause between live query reconnection attempts.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Todo store backed by a remote collection.
pub struct RemoteTodoStore {
    backend: Arc<dyn RemoteBackend>,
    state: Arc<watch::Sender<TodoState>>,
    live_query: JoinHandle<()>,
}

impl RemoteTodoStore {
    /// Create the store and start its live query.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(backend: Arc<dyn RemoteBackend>) -> Self {
        Self::with_reconnect_delay(backend, DEFAULT_RECONNECT_DELAY)
    }

    pub fn with_reconnect_delay(backend: Arc<dyn RemoteBackend>, delay: Duration) -> Self {
        let (state, _) = watch::channel(TodoState::loading());
        let state = Arc::new(state);
        let live_query = tokio::spawn(run_live_query(backend.clone(), state.clone(), delay));

        Self {
            backend,
            state,
            live_query,
        }
    }
}

impl Drop for RemoteTodoStore {
    fn drop(&mut self) {
        self.live_query.abort();
    }
}

/// Keep the live query open, reconnecting after `delay` whenever it ends.
///
/// The last received collection stays published while disconnected.
async fn run_live_query(
    backend: Arc<dyn RemoteBackend>,
    state: Arc<watch::Sender<TodoState>>,
    delay: Duration,
) {
    loop {
        match backend.watch_todos().await {
            Ok(mut stream) => {
                info!("Live query subscribed");
                while let Some(update) = stream.next().await {
                    match update {
                        Ok(todos) => {
                            debug!(count = todos.len(), "Live query update");
                            state.send_replace(TodoState::ready(todos));
                        }
                        Err(e) => {
                            warn!(error = %e, "Live query failed");
                            break;
                        }
                    }
                }
                warn!("Live query disconnected");
            }
            Err(e) => {
                warn!(error = %e, "Failed to open live query");
            }
        }

        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl TodoStore for RemoteTodoStore {
    fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.state.subscribe()
    }

    async fn add(&self, text: &str) -> Result<()> {
        let Some(text) = clean_text(text) else {
            return Ok(());
        };
        let id = self.backend.add_todo(text).await?;
        debug!(todo_id = %id, "Added remote todo");
        Ok(())
    }

    async fn toggle(&self, id: &str) -> Result<()> {
        self.backend.toggle_todo(id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.backend.delete_todo(id).await
    }

    async fn update(&self, id: &str, text: &str) -> Result<()> {
        let Some(text) = clean_text(text) else {
            return Ok(());
        };
        self.backend.update_todo(id, text).await
    }

    async fn clear_all(&self) -> Result<usize> {
        let result = self.backend.clear_all_todos().await?;
        info!(deleted = result.deleted_count, "Cleared remote todos");
        Ok(result.deleted_count)
    }
}
