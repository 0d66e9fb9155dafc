//! Best-effort coercion of persisted data into todos.
//!
//! Whatever was read back from storage (an older schema, a hand-edited file,
//! a partially written value) goes through [`normalize`] before it reaches a
//! store. Malformed shapes degrade to omission or defaults; this module never
//! returns an error and never panics.
//!
//! Coercion rules per entry:
//!
//! | field            | rule |
//! |------------------|------|
//! | entry            | must be an object whose `text` is a string, else dropped |
//! | `_id` / `id`     | string kept, number/bool stringified, null or absent gets a fresh id, arrays/objects use their JSON text |
//! | `isCompleted`    | truthiness: `false`, `0`, `""`, `null` and absent are false |
//! | `_creationTime` / `creationTime` | any number (fractions truncated), else `now` |

use crate::todo::sort_newest_first;
use crate::{generate_id, Timestamp, Todo, TodoId};
use serde_json::{Map, Number, Value};

/// Normalize an arbitrary value into todos ordered newest first.
///
/// `now` is used both as the creation time of entries without a usable one
/// and as the timestamp part of generated ids.
pub fn normalize(value: &Value, now: Timestamp) -> Vec<Todo> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    let mut todos: Vec<Todo> = entries
        .iter()
        .filter_map(|entry| normalize_entry(entry, now))
        .collect();
    sort_newest_first(&mut todos);
    todos
}

fn normalize_entry(entry: &Value, now: Timestamp) -> Option<Todo> {
    let fields = entry.as_object()?;
    let text = fields.get("text")?.as_str()?;

    let id = field(fields, "_id", "id")
        .and_then(coerce_id)
        .unwrap_or_else(|| generate_id(now));
    let is_completed = fields.get("isCompleted").is_some_and(is_truthy);
    let creation_time = field(fields, "_creationTime", "creationTime")
        .and_then(coerce_timestamp)
        .unwrap_or(now);

    Some(Todo {
        id,
        text: text.to_string(),
        is_completed,
        creation_time,
    })
}

/// Look up `key`, falling back to `alias` when `key` is absent.
fn field<'a>(fields: &'a Map<String, Value>, key: &str, alias: &str) -> Option<&'a Value> {
    fields.get(key).or_else(|| fields.get(alias))
}

fn coerce_id(value: &Value) -> Option<TodoId> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_to_id(n)),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Integral floats lose their fraction (`1.0` becomes `"1"`), like
/// JavaScript's `String(number)` below `1e21`.
fn number_to_id(number: &Number) -> TodoId {
    if !number.is_f64() {
        return number.to_string();
    }
    match number.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(),
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => number.to_string(),
    }
}

fn coerce_timestamp(value: &Value) -> Option<Timestamp> {
    let Value::Number(number) = value else {
        return None;
    };
    number
        .as_i64()
        // `as` saturates out-of-range floats
        .or_else(|| number.as_f64().map(|f| f.trunc() as Timestamp))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
