//! InMemoryBookStore - BTreeMap-backed store for testing and local use.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

use super::{check_key, BookStore};
use crate::book::{BookRecord, NewBook};
use crate::error::StoreError;

/// In-memory book collection with store-side key assignment.
///
/// Keys are `-B` followed by a zero-padded counter, so ascending key order is
/// creation order. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryBookStore {
    books: Arc<RwLock<BTreeMap<String, NewBook>>>,
    next_key: Arc<AtomicU64>,
}

impl InMemoryBookStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `books`, keyed in iteration order.
    pub fn with_books(books: impl IntoIterator<Item = NewBook>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.books.write() {
            for book in books {
                map.insert(store.assign_key(), book);
            }
        }
        store
    }

    fn assign_key(&self) -> String {
        let n = self.next_key.fetch_add(1, Ordering::SeqCst) + 1;
        format!("-B{:018}", n)
    }

    /// Insert a field set and return its new key.
    pub fn insert(&self, book: NewBook) -> Result<String, StoreError> {
        let key = self.assign_key();
        self.books
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?
            .insert(key.clone(), book);
        Ok(key)
    }

    /// Remove a key. Returns true if it existed.
    pub fn remove(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .books
            .write()
            .map_err(|_| StoreError::LockPoisoned("remove"))?
            .remove(id)
            .is_some())
    }

    /// Current records in key order.
    pub fn records(&self) -> Result<Vec<BookRecord>, StoreError> {
        let books = self
            .books
            .read()
            .map_err(|_| StoreError::LockPoisoned("records"))?;
        Ok(books
            .iter()
            .map(|(id, book)| book.clone().into_record(id.clone()))
            .collect())
    }

    /// The collection as the store's JSON document: an object of field sets,
    /// or `null` when empty.
    pub fn document(&self) -> Result<Value, StoreError> {
        let books = self
            .books
            .read()
            .map_err(|_| StoreError::LockPoisoned("document"))?;
        if books.is_empty() {
            return Ok(Value::Null);
        }

        let mut document = Map::new();
        for (id, book) in books.iter() {
            document.insert(id.clone(), serde_json::to_value(book)?);
        }
        Ok(Value::Object(document))
    }

    pub fn len(&self) -> usize {
        self.books.read().map(|books| books.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BookStore for InMemoryBookStore {
    async fn list_all(&self) -> Result<Vec<BookRecord>, StoreError> {
        self.records()
    }

    async fn create(&self, book: &NewBook) -> Result<Option<String>, StoreError> {
        self.insert(book.clone()).map(Some)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        check_key(id)?;
        self.remove(id)?;
        Ok(())
    }
}
