//! The todo record.

use crate::{Timestamp, TodoId};
use serde::{Deserialize, Serialize};

/// A single todo item.
///
/// Field names on the wire follow the document format of the remote
/// collection (`_id`, `_creationTime`), which is also the format of the
/// on-device snapshot. `id` and `creationTime` are accepted when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier, opaque to consumers
    #[serde(rename = "_id", alias = "id")]
    pub id: TodoId,
    /// Trimmed, non-empty text
    pub text: String,
    /// Completion flag
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
    /// When the record was created (milliseconds since epoch)
    #[serde(rename = "_creationTime", alias = "creationTime")]
    pub creation_time: Timestamp,
}

impl Todo {
    /// Create a new, not yet completed todo.
    pub fn new(id: impl Into<TodoId>, text: impl Into<String>, creation_time: Timestamp) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_completed: false,
            creation_time,
        }
    }

    /// Flip the completion flag.
    pub fn toggle(&mut self) {
        self.is_completed = !self.is_completed;
    }
}

/// Trim user input, returning `None` when nothing is left.
pub fn clean_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Sort newest first. The sort is stable, so equal creation times keep their
/// current relative order.
pub fn sort_newest_first(todos: &mut [Todo]) {
    todos.sort_by(|a, b| b.creation_time.cmp(&a.creation_time));
}
