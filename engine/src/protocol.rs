//! Wire protocol between the remote store adapter and the todo server.
//!
//! Query and mutations travel over HTTP with JSON bodies in camelCase. The
//! live query is a WebSocket carrying tagged JSON messages in snake_case.

use crate::{Todo, TodoId};
use serde::{Deserialize, Serialize};

/// Body of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoArgs {
    pub text: String,
}

/// Response of `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoResponse {
    /// Server-assigned id of the new record
    pub id: TodoId,
}

/// Body of `PATCH /todos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoArgs {
    pub text: String,
}

/// Response of `DELETE /todos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearAllResponse {
    pub deleted_count: usize,
}

/// Error body returned by the server for any failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Messages sent from client to server on the live query socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Keep-alive ping.
    Ping,
    /// Ask for the current collection again.
    Refresh,
}

/// Messages sent from server to client on the live query socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The full collection, newest first. Sent on connect and after every
    /// change.
    Todos { todos: Vec<Todo> },

    /// Response to ping.
    Pong,

    /// Error message.
    Error { message: String },
}

impl ServerMessage {
    /// Create an error message.
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }
}
