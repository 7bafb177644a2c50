//! BookStore - Abstract CRUD access to the remote book collection.

use std::future::Future;

use crate::book::{BookRecord, NewBook};
use crate::error::StoreError;

/// Abstract access to the remote collection of books.
///
/// Implementations do not retry, de-duplicate or cancel requests. The store
/// is the only source of truth: callers re-read the whole collection after
/// every mutation instead of patching their copy.
pub trait BookStore: Send + Sync {
    /// Fetch the entire collection in ascending key order.
    /// An empty collection is `Ok(vec![])`, not an error.
    fn list_all(&self) -> impl Future<Output = Result<Vec<BookRecord>, StoreError>> + Send;

    /// Submit a new book. The store assigns its key.
    ///
    /// Any accepted submission is `Ok`. The key is `None` when the store
    /// accepted the book but its answer did not say which key it assigned.
    fn create(
        &self,
        book: &NewBook,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Remove the book stored under `id`. Removing a missing key is a no-op.
    /// Keys that [`check_key`](super::check_key) rejects fail with
    /// [`StoreError::InvalidKey`] without touching the store.
    fn delete(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}
