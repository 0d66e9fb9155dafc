//! TodoList - the in-memory working set.
//!
//! A `TodoList` keeps its records ordered newest first and applies the
//! mutations shared by every backend. It has no notion of persistence; the
//! caller decides when and where the list is written.

use crate::todo::{clean_text, sort_newest_first};
use crate::{Timestamp, Todo, TodoId};
use serde::{Deserialize, Serialize};

/// An ordered collection of todos, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList {
    todos: Vec<Todo>,
}

impl TodoList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { todos: Vec::new() }
    }

    /// Build a list from records in any order.
    ///
    /// Records are sorted newest first. Later duplicates of an id are dropped.
    pub fn from_todos(mut todos: Vec<Todo>) -> Self {
        let mut seen = std::collections::HashSet::new();
        todos.retain(|t| seen.insert(t.id.clone()));
        sort_newest_first(&mut todos);
        Self { todos }
    }

    /// Get a todo by id.
    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Add a todo created at `now`.
    ///
    /// Returns `None` without touching the list when `text` is empty after
    /// trimming. The new record goes ahead of every record that is not newer
    /// than it, which is the front of the list unless the clock went back.
    pub fn add(
        &mut self,
        text: &str,
        id: impl Into<TodoId>,
        now: Timestamp,
    ) -> Option<&Todo> {
        let text = clean_text(text)?;
        let todo = Todo::new(id, text, now);
        let pos = self.todos.partition_point(|t| t.creation_time > now);
        self.todos.insert(pos, todo);
        self.todos.get(pos)
    }

    /// Flip the completion flag of `id`. Returns whether a record matched.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.toggle();
                true
            }
            None => false,
        }
    }

    /// Replace the text of `id`.
    ///
    /// Returns `false` when the cleaned text is empty or no record matched.
    pub fn update(&mut self, id: &str, text: &str) -> bool {
        let Some(text) = clean_text(text) else {
            return false;
        };
        match self.todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove `id`, returning the removed record.
    pub fn remove(&mut self, id: &str) -> Option<Todo> {
        let pos = self.todos.iter().position(|t| t.id == id)?;
        Some(self.todos.remove(pos))
    }

    /// Remove every record and return how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.todos.len();
        self.todos.clear();
        count
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter()
    }

    pub fn as_slice(&self) -> &[Todo] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}
