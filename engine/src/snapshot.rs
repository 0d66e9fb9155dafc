//! Snapshot codec for the on-device store.
//!
//! The local store persists its whole collection as one JSON array under
//! [`STORAGE_KEY`]. Every write replaces the previous snapshot; there is no
//! incremental diffing.
//!
//! Decoding runs the parsed value through [`normalize`](crate::normalize), so
//! a snapshot that parses as JSON always yields a usable list. Only text that
//! is not JSON at all is reported as an error.

use crate::{error::Result, normalize, Error, Timestamp, Todo};

/// Storage key of the persisted snapshot.
pub const STORAGE_KEY: &str = "todos_local_v1";

/// Serialize a collection to its persisted form.
pub fn encode(todos: &[Todo]) -> Result<String> {
    serde_json::to_string(todos).map_err(|e| Error::Serialization(e.to_string()))
}

/// Parse and normalize a persisted snapshot.
///
/// An empty string is treated as "nothing stored yet".
pub fn decode(raw: &str, now: Timestamp) -> Result<Vec<Todo>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| Error::InvalidSnapshot(e.to_string()))?;

    Ok(normalize(&value, now))
}
