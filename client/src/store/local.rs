//! Local store - the on-device adapter.
//!
//! The whole collection lives in memory and is mirrored to one key-value slot
//! as a JSON snapshot. Every mutation computes the next collection, swaps it
//! in, publishes it and then writes the full snapshot back.
//!
//! Storage is best effort. Read and parse failures at load time leave an
//! empty collection; write failures are logged and the in-memory collection
//! stays authoritative. Nothing here is rolled back, so a crash after a failed
//! write loses the change.

use super::{TodoState, TodoStore};
use crate::error::Result;
use crate::storage::KeyValueStorage;
use async_trait::async_trait;
use std::sync::Arc;
use todo_engine::{generate_id, snapshot, Clock, SystemClock, TodoList};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Lifecycle of the in-memory collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing read from storage yet
    Uninitialized,
    /// Reading the persisted snapshot
    Loading,
    /// The in-memory collection is authoritative
    Ready,
}

/// Todo store persisted to on-device key-value storage.
pub struct LocalTodoStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    key: String,
    /// Latest collection. Held across storage IO, which serializes mutations.
    todos: Mutex<TodoList>,
    load_state: watch::Sender<LoadState>,
    state: watch::Sender<TodoState>,
}

impl LocalTodoStore {
    /// Create an unloaded store using the system clock and
    /// [`snapshot::STORAGE_KEY`].
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    /// Create an unloaded store with an explicit clock.
    pub fn with_clock(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        let (load_state, _) = watch::channel(LoadState::Uninitialized);
        let (state, _) = watch::channel(TodoState::loading());
        Self {
            storage,
            clock,
            key: snapshot::STORAGE_KEY.to_string(),
            todos: Mutex::new(TodoList::new()),
            load_state,
            state,
        }
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Create a store and load it.
    pub async fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        let store = Self::new(storage);
        store.load().await;
        store
    }

    pub fn load_state(&self) -> LoadState {
        *self.load_state.borrow()
    }

    /// Read the persisted snapshot, unless that already happened.
    ///
    /// Mutations call this implicitly, so a mutation issued before the first
    /// load never overwrites persisted data with an empty collection.
    pub async fn load(&self) {
        let mut todos = self.todos.lock().await;
        self.ensure_loaded(&mut todos).await;
    }

    async fn ensure_loaded(&self, todos: &mut TodoList) {
        if self.load_state() == LoadState::Ready {
            return;
        }
        self.load_state.send_replace(LoadState::Loading);

        *todos = match self.read_snapshot().await {
            Ok(list) => {
                info!(key = %self.key, count = list.len(), "Loaded local todos");
                list
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to load local todos");
                TodoList::new()
            }
        };

        self.load_state.send_replace(LoadState::Ready);
        self.state
            .send_replace(TodoState::ready(todos.as_slice().to_vec()));
    }

    async fn read_snapshot(&self) -> Result<TodoList> {
        let Some(raw) = self.storage.get_item(&self.key).await? else {
            return Ok(TodoList::new());
        };
        let todos = snapshot::decode(&raw, self.clock.now_millis())?;
        Ok(TodoList::from_todos(todos))
    }

    /// Swap in `next`, publish it and write it back.
    async fn commit(&self, current: &mut TodoList, next: TodoList) {
        *current = next;
        self.state
            .send_replace(TodoState::ready(current.as_slice().to_vec()));
        self.persist(current).await;
    }

    async fn persist(&self, todos: &TodoList) {
        let raw = match snapshot::encode(todos.as_slice()) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to encode local todos");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&self.key, &raw).await {
            warn!(key = %self.key, error = %e, "Failed to save local todos");
        }
    }
}

#[async_trait]
impl TodoStore for LocalTodoStore {
    fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.state.subscribe()
    }

    async fn add(&self, text: &str) -> Result<()> {
        let mut todos = self.todos.lock().await;
        self.ensure_loaded(&mut todos).await;

        let now = self.clock.now_millis();
        let mut next = todos.clone();
        let Some(todo) = next.add(text, generate_id(now), now) else {
            return Ok(());
        };
        debug!(todo_id = %todo.id, "Added local todo");

        self.commit(&mut todos, next).await;
        Ok(())
    }

    async fn toggle(&self, id: &str) -> Result<()> {
        let mut todos = self.todos.lock().await;
        self.ensure_loaded(&mut todos).await;

        let mut next = todos.clone();
        if !next.toggle(id) {
            debug!(todo_id = %id, "Toggle of unknown local todo ignored");
            return Ok(());
        }

        self.commit(&mut todos, next).await;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut todos = self.todos.lock().await;
        self.ensure_loaded(&mut todos).await;

        let mut next = todos.clone();
        if next.remove(id).is_none() {
            debug!(todo_id = %id, "Delete of unknown local todo ignored");
            return Ok(());
        }

        self.commit(&mut todos, next).await;
        Ok(())
    }

    async fn update(&self, id: &str, text: &str) -> Result<()> {
        let mut todos = self.todos.lock().await;
        self.ensure_loaded(&mut todos).await;

        let mut next = todos.clone();
        if !next.update(id, text) {
            return Ok(());
        }

        self.commit(&mut todos, next).await;
        Ok(())
    }

    async fn clear_all(&self) -> Result<usize> {
        let mut todos = self.todos.lock().await;
        self.ensure_loaded(&mut todos).await;

        let mut next = todos.clone();
        let deleted = next.clear();
        info!(deleted, "Cleared local todos");

        self.commit(&mut todos, next).await;
        Ok(deleted)
    }
}
