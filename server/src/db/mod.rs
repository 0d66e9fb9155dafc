//! Storage of the todo collection.
//!
//! Handlers only see [`TodoRepository`]. The server runs against PostgreSQL
//! when `DATABASE_URL` is set and against an in-process collection otherwise.

mod memory;
mod postgres;

pub use memory::MemoryTodoRepository;
pub use postgres::PgTodoRepository;

use crate::error::Result;
use async_trait::async_trait;
use todo_engine::{Todo, TodoId};

/// The remote todo collection.
///
/// Methods addressing a single record return whether it existed; turning a
/// miss into an error is up to the caller. Text arrives already cleaned.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos, newest first. Equal creation times keep the later insert
    /// first.
    async fn list(&self) -> Result<Vec<Todo>>;

    /// Insert an incomplete todo, assigning id and creation time.
    async fn insert(&self, text: &str) -> Result<TodoId>;

    async fn toggle(&self, id: &str) -> Result<bool>;

    async fn update_text(&self, id: &str, text: &str) -> Result<bool>;

    async fn delete(&self, id: &str) -> Result<bool>;

    /// Delete every todo, returning how many there were.
    async fn clear(&self) -> Result<usize>;
}
