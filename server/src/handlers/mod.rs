//! Request handlers for the todo collection.

mod todos;
mod websocket;

pub use todos::*;
pub use websocket::handle_live_connection;
