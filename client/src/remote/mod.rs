//! Query and mutation primitives of the remote todo collection.

mod http;

pub use http::HttpBackend;

use crate::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use todo_engine::{ClearAllResponse, Todo, TodoId};

/// A stream of full collections pushed by the live query.
pub type TodoStream = BoxStream<'static, Result<Vec<Todo>>>;

/// The remote document collection as seen by the remote store.
///
/// Lookup misses are errors here: toggling, updating or deleting an id the
/// collection does not hold fails with a 404 [`Error::Remote`](crate::Error::Remote).
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// One-shot query of the whole collection, newest first.
    async fn get_todos(&self) -> Result<Vec<Todo>>;

    /// Insert a todo; the server assigns id and creation time.
    async fn add_todo(&self, text: &str) -> Result<TodoId>;

    async fn toggle_todo(&self, id: &str) -> Result<()>;

    async fn delete_todo(&self, id: &str) -> Result<()>;

    async fn update_todo(&self, id: &str, text: &str) -> Result<()>;

    async fn clear_all_todos(&self) -> Result<ClearAllResponse>;

    /// Open the live query. The stream yields the current collection first
    /// and then again after every change, until the connection ends.
    async fn watch_todos(&self) -> Result<TodoStream>;
}
