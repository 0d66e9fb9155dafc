//! # Todo Engine
//!
//! The IO-free core shared by the todo client adapters and the todo server.
//!
//! This crate owns the todo record model and every rule about it that does
//! not depend on where the records live: text cleaning, ordering, id
//! generation, the normalization of untrusted persisted data, the snapshot
//! codec used by the on-device store, and the wire protocol spoken between the
//! remote adapter and the server.
//!
//! ## Design Principles
//!
//! - **No IO**: Engine has no knowledge of files, network, or platform
//! - **Never panics on input**: malformed persisted data degrades to omission
//!   or defaults, never to an error
//! - **Testable**: time is injected through [`Clock`], so every rule can be
//!   exercised deterministically
//!
//! ## Core Concepts
//!
//! ### Todos
//!
//! A [`Todo`] has an opaque id, a trimmed non-empty text, a completion flag
//! and an immutable creation time in milliseconds since the epoch.
//!
//! ### Todo lists
//!
//! A [`TodoList`] is an ordered working set (newest first) with the pure
//! mutations both backends share: add, toggle, update, remove and clear.
//!
//! ### Normalization
//!
//! [`normalize`] turns any `serde_json::Value` into a valid, ordered list of
//! todos. It is the only defense against corrupted or schema-drifted data.
//!
//! ## Quick Start
//!
//! ```rust
//! use todo_engine::{snapshot, ManualClock, Clock, TodoList};
//!
//! let clock = ManualClock::new(1_706_745_600_000);
//! let mut list = TodoList::new();
//!
//! list.add("  Buy milk ", "todo-1", clock.now_millis());
//! clock.advance(1);
//! list.add("Walk dog", "todo-2", clock.now_millis());
//!
//! let texts: Vec<_> = list.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["Walk dog", "Buy milk"]);
//!
//! // Persist and restore the whole list.
//! let raw = snapshot::encode(list.as_slice()).unwrap();
//! let restored = snapshot::decode(&raw, clock.now_millis()).unwrap();
//! assert_eq!(restored, list.as_slice());
//! ```

pub mod clock;
pub mod error;
pub mod id;
pub mod list;
pub mod normalize;
pub mod protocol;
pub mod snapshot;
pub mod todo;

// Re-export main types at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::Error;
pub use id::generate_id;
pub use list::TodoList;
pub use normalize::normalize;
pub use protocol::{
    AddTodoArgs, AddTodoResponse, ClearAllResponse, ClientMessage, ErrorResponse, ServerMessage,
    UpdateTodoArgs,
};
pub use snapshot::STORAGE_KEY;
pub use todo::{clean_text, Todo};

/// Type aliases for clarity
pub type TodoId = String;
pub type Timestamp = i64;
