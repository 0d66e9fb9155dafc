//! # Todo Client
//!
//! A todo store with two interchangeable backends behind one interface.
//!
//! - [`LocalTodoStore`] keeps the collection on the device, in any
//!   [`KeyValueStorage`], and works fully offline.
//! - [`RemoteTodoStore`] talks to a `todo-server` instance and keeps a live
//!   query open, so every server-side change shows up without polling.
//!
//! Which one is active is decided once at startup from [`ClientConfig`] and
//! handed to consumers through a [`TodoContext`].
//!
//! ```no_run
//! use todo_client::{ClientConfig, TodoContext};
//!
//! # async fn run() -> todo_client::Result<()> {
//! let context = TodoContext::open(&ClientConfig::local(".todo-data")).await?;
//! context.add_todo("Buy milk").await?;
//!
//! for todo in context.todos() {
//!     println!("[{}] {}", if todo.is_completed { "x" } else { " " }, todo.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod remote;
pub mod storage;
pub mod store;

pub use config::{ClientConfig, ConfigError, StoreMode};
pub use context::{open_store, TodoContext};
pub use error::{Error, Result};
pub use remote::{HttpBackend, RemoteBackend};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{LoadState, LocalTodoStore, RemoteTodoStore, TodoState, TodoStore};
