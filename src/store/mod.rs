//! Remote store client - CRUD access to a path-addressed collection of books.
//!
//! The store is a JSON document tree in which the collection is an object
//! mapping store-assigned keys to book field sets. A listing is normalized
//! into an ordered `Vec<BookRecord>`; an empty collection comes back as
//! `null` and normalizes to an empty vec.
//!
//! ## Example
//!
//! ```ignore
//! use bookshelf::{BookStore, InMemoryBookStore, NewBook};
//!
//! let store = InMemoryBookStore::new();
//! let id = store.create(&NewBook::new("Dune", "Frank Herbert")).await?;
//! let books = store.list_all().await?;
//! if let Some(id) = id {
//!     store.delete(&id).await?;
//! }
//! ```

#[cfg(feature = "http")]
pub mod http;
mod in_memory;
mod store;

use serde_json::Value;

use crate::book::{BookRecord, NewBook};
use crate::error::StoreError;

pub use in_memory::InMemoryBookStore;
pub use store::BookStore;

/// Characters that would make a key address another node of the document.
const RESERVED_KEY_CHARS: &[char] = &['/', '.', '#', '$', '[', ']', '?'];

/// Check that `id` names exactly one record under the collection.
///
/// An empty key would address the collection itself.
pub fn check_key(id: &str) -> Result<(), StoreError> {
    let reason = if id.is_empty() {
        "empty"
    } else if id.contains(RESERVED_KEY_CHARS) {
        "contains one of / . # $ [ ] ?"
    } else if id.chars().any(char::is_control) {
        "contains a control character"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidKey {
        key: id.to_string(),
        reason,
    })
}

/// Turn a collection document into records, in ascending key order.
pub fn normalize_collection(document: Value) -> Result<Vec<BookRecord>, StoreError> {
    match document {
        Value::Null => Ok(Vec::new()),
        Value::Object(entries) => {
            let mut books = Vec::with_capacity(entries.len());
            for (id, fields) in entries {
                let fields: NewBook = serde_json::from_value(fields).map_err(|e| {
                    StoreError::Decode(format!("record {}: {}", id, e))
                })?;
                books.push(fields.into_record(id));
            }
            Ok(books)
        }
        other => Err(StoreError::Decode(format!(
            "expected an object of records, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
