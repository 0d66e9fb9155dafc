//! Live query subscriptions.
//!
//! Clients open `GET /todos/live` and receive the whole collection on connect
//! and again after every change. Messages are the
//! [`ClientMessage`](todo_engine::ClientMessage) and
//! [`ServerMessage`](todo_engine::ServerMessage) types of `todo-engine`.

mod manager;

pub use manager::SubscriptionManager;
