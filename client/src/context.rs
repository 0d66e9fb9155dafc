//! Store selection and the accessor presentation code uses.

use crate::config::{ClientConfig, ConfigError, StoreMode};
use crate::error::Result;
use crate::remote::HttpBackend;
use crate::storage::FileStorage;
use crate::store::{LocalTodoStore, RemoteTodoStore, TodoState, TodoStore};
use std::sync::Arc;
use todo_engine::Todo;
use tokio::sync::watch;
use tracing::info;

/// Build the store selected by `config`.
///
/// Remote mode fails without a valid remote URL; local mode loads the
/// snapshot from `config.data_dir` before returning.
pub async fn open_store(config: &ClientConfig) -> Result<Arc<dyn TodoStore>> {
    config.validate()?;

    match config.mode {
        StoreMode::Local => {
            info!(data_dir = %config.data_dir.display(), "Using local todo store");
            let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
            Ok(Arc::new(LocalTodoStore::open(storage).await))
        }
        StoreMode::Remote => {
            let url = config
                .remote_url
                .as_deref()
                .ok_or(ConfigError::MissingRemoteUrl)?;
            info!(url = %url, "Using remote todo store");
            let backend = Arc::new(HttpBackend::new(url)?);
            Ok(Arc::new(RemoteTodoStore::new(backend)))
        }
    }
}

/// Hands the active store to consumers.
///
/// Which backend sits behind it is decided once, when the context is built.
#[derive(Clone)]
pub struct TodoContext {
    store: Arc<dyn TodoStore>,
}

impl TodoContext {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Build the context for the store selected by `config`.
    pub async fn open(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(open_store(config).await?))
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.store.list()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn state(&self) -> TodoState {
        self.store.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.store.subscribe()
    }

    /// Wait until the initial load or fetch has completed and return that
    /// state.
    pub async fn loaded(&self) -> TodoState {
        let mut rx = self.subscribe();
        let loaded = rx
            .wait_for(|state| !state.is_loading)
            .await
            .map(|state| state.clone());
        // The store is gone; report whatever was published last
        loaded.unwrap_or_else(|_| rx.borrow().clone())
    }

    pub async fn add_todo(&self, text: &str) -> Result<()> {
        self.store.add(text).await
    }

    pub async fn toggle_todo(&self, id: &str) -> Result<()> {
        self.store.toggle(id).await
    }

    pub async fn delete_todo(&self, id: &str) -> Result<()> {
        self.store.delete(id).await
    }

    pub async fn update_todo(&self, id: &str, text: &str) -> Result<()> {
        self.store.update(id, text).await
    }

    pub async fn clear_all_todos(&self) -> Result<usize> {
        self.store.clear_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::MemoryStorage;
    use todo_engine::ManualClock;

    fn local_context() -> TodoContext {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(1_000));
        TodoContext::new(Arc::new(LocalTodoStore::with_clock(storage, clock)))
    }

    #[tokio::test]
    async fn forwards_to_the_store() {
        let context = local_context();

        context.add_todo("Buy milk").await.unwrap();
        let id = context.todos()[0].id.clone();
        context.toggle_todo(&id).await.unwrap();
        context.update_todo(&id, "Buy oat milk").await.unwrap();

        let state = context.loaded().await;
        assert_eq!(state.todos.len(), 1);
        assert_eq!(state.todos[0].text, "Buy oat milk");
        assert!(state.todos[0].is_completed);

        context.delete_todo(&id).await.unwrap();
        assert!(context.todos().is_empty());
        assert_eq!(context.clear_all_todos().await.unwrap(), 0);
    }

    /// A store whose publisher went away before loading finished.
    struct AbandonedStore(watch::Receiver<TodoState>);

    #[async_trait::async_trait]
    impl TodoStore for AbandonedStore {
        fn subscribe(&self) -> watch::Receiver<TodoState> {
            self.0.clone()
        }

        async fn add(&self, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn toggle(&self, _id: &str) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _id: &str) -> Result<()> {
            Ok(())
        }

        async fn update(&self, _id: &str, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn clear_all(&self) -> Result<usize> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn loaded_reports_last_state_once_store_is_gone() {
        let (tx, rx) = watch::channel(TodoState::loading());
        drop(tx);
        let context = TodoContext::new(Arc::new(AbandonedStore(rx)));

        let state = context.loaded().await;
        assert_eq!(state, TodoState::loading());
    }

    #[tokio::test]
    async fn local_mode_opens_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::local(dir.path());

        let context = TodoContext::open(&config).await.unwrap();
        assert!(!context.is_loading());
        context.add_todo("Walk dog").await.unwrap();

        let reopened = TodoContext::open(&config).await.unwrap();
        let texts: Vec<_> = reopened.todos().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Walk dog"]);
    }

    #[tokio::test]
    async fn remote_mode_requires_url() {
        let mut config = ClientConfig::remote("http://localhost:3000");
        config.remote_url = None;

        let result = open_store(&config).await;
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingRemoteUrl))
        ));
    }

    #[tokio::test]
    async fn remote_mode_rejects_bad_url() {
        let config = ClientConfig::remote("not a url");

        let result = open_store(&config).await;
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidRemoteUrl(_)))
        ));
    }
}
