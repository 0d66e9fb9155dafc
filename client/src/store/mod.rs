//! The todo store interface and its two adapters.
//!
//! Presentation code talks to a [`TodoStore`] and never touches records
//! directly. Both adapters publish every new collection through a
//! `tokio::sync::watch` channel, so consumers can either read the latest
//! [`TodoState`] or await changes.
//!
//! | | [`LocalTodoStore`] | [`RemoteTodoStore`] |
//! |---|---|---|
//! | ids and ordering | assigned on device | assigned by the server |
//! | unknown id on toggle/update/delete | silent no-op | `Err(Error::Remote { status: 404, .. })` |
//! | storage failures | logged, never returned | returned to the caller |
//! | `is_loading` | until the snapshot is read | until the first live query result |

mod local;
mod remote;

pub use local::{LoadState, LocalTodoStore};
pub use remote::{RemoteTodoStore, DEFAULT_RECONNECT_DELAY};

use crate::error::Result;
use async_trait::async_trait;
use todo_engine::Todo;
use tokio::sync::watch;

/// What a consumer renders: the ordered collection and a loading flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    /// Todos, newest first
    pub todos: Vec<Todo>,
    /// True until the initial load or fetch has completed
    pub is_loading: bool,
}

impl TodoState {
    /// The state before anything has been loaded.
    pub fn loading() -> Self {
        Self {
            todos: Vec::new(),
            is_loading: true,
        }
    }

    /// A loaded state.
    pub fn ready(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            is_loading: false,
        }
    }

    pub fn total_count(&self) -> usize {
        self.todos.len()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.is_completed).count()
    }

    /// Share of completed todos in percent, 0 when there are none.
    pub fn progress_percentage(&self) -> f64 {
        match self.total_count() {
            0 => 0.0,
            total => self.completed_count() as f64 / total as f64 * 100.0,
        }
    }
}

/// The shared contract of both backends.
///
/// Every operation resolves once the change is durable: written to device
/// storage for the local store, acknowledged by the server for the remote
/// store. Text is trimmed before use, and empty text makes `add` and
/// `update` silent no-ops on both backends.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Subscribe to state changes.
    fn subscribe(&self) -> watch::Receiver<TodoState>;

    /// The latest state.
    fn state(&self) -> TodoState {
        self.subscribe().borrow().clone()
    }

    /// The latest collection, newest first.
    fn list(&self) -> Vec<Todo> {
        self.state().todos
    }

    fn is_loading(&self) -> bool {
        self.subscribe().borrow().is_loading
    }

    /// Create a todo from `text`.
    async fn add(&self, text: &str) -> Result<()>;

    /// Flip the completion flag of `id`.
    async fn toggle(&self, id: &str) -> Result<()>;

    /// Remove `id`.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Replace the text of `id`.
    async fn update(&self, id: &str, text: &str) -> Result<()>;

    /// Remove every todo and return how many were removed.
    async fn clear_all(&self) -> Result<usize>;
}
