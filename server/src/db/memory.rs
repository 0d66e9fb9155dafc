//! In-process todo collection, used when no database is configured.

use super::TodoRepository;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use todo_engine::{Clock, SystemClock, Todo, TodoId, TodoList};
use tokio::sync::RwLock;

/// Todo collection held in memory. Contents are lost on restart.
#[derive(Debug)]
pub struct MemoryTodoRepository {
    todos: RwLock<TodoList>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            todos: RwLock::new(TodoList::new()),
            clock,
        }
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.todos.read().await.as_slice().to_vec())
    }

    async fn insert(&self, text: &str) -> Result<TodoId> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = self.clock.now_millis();

        let mut todos = self.todos.write().await;
        match todos.add(text, id, now) {
            Some(todo) => Ok(todo.id.clone()),
            None => Err(AppError::BadRequest("text must not be empty".to_string())),
        }
    }

    async fn toggle(&self, id: &str) -> Result<bool> {
        Ok(self.todos.write().await.toggle(id))
    }

    async fn update_text(&self, id: &str, text: &str) -> Result<bool> {
        Ok(self.todos.write().await.update(id, text))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.todos.write().await.remove(id).is_some())
    }

    async fn clear(&self) -> Result<usize> {
        Ok(self.todos.write().await.clear())
    }
}
