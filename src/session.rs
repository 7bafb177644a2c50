//! CatalogSession - wires a [`BookStore`] to a shared [`Catalog`].
//!
//! Every mutation goes to the store first and is followed by a full reload;
//! the catalog is never patched locally. Store failures are logged and leave
//! the previous collection in place.
//!
//! ## Example
//!
//! ```ignore
//! use bookshelf::{CatalogSession, Command, InMemoryBookStore, NewBook};
//!
//! let session = CatalogSession::new(InMemoryBookStore::new());
//! session.reload().await;
//! session.handle(Command::Add(NewBook::new("Dune", "Frank Herbert"))).await;
//! session.handle(Command::Search("dune".into())).await;
//! assert_eq!(session.view().len(), 1);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::book::{BookRecord, NewBook};
use crate::catalog::{Catalog, SubscriptionId};
use crate::error::StoreError;
use crate::store::BookStore;

/// An event from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Re-fetch the whole collection.
    Reload,
    /// Change the search term.
    Search(String),
    /// Create a book, then reload.
    Add(NewBook),
    /// Delete a book by id, then reload.
    Delete(String),
}

/// A store plus the catalog it feeds. Cheap to clone; clones share both.
pub struct CatalogSession<S> {
    store: Arc<S>,
    catalog: Arc<Mutex<Catalog>>,
}

impl<S> Clone for CatalogSession<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<S: BookStore + 'static> CatalogSession<S> {
    /// Create a session with an empty catalog. Call [`reload`](Self::reload)
    /// to populate it.
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            store,
            catalog: Arc::new(Mutex::new(Catalog::new())),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the whole collection and replace the catalog with it.
    ///
    /// Returns false if the fetch failed; the previous collection is kept.
    /// When reloads overlap, whichever completes last wins.
    pub async fn reload(&self) -> bool {
        match self.store.list_all().await {
            Ok(books) => {
                let count = books.len();
                self.catalog.lock().replace_collection(books);
                tracing::info!(count, "catalog reloaded");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to reload catalog, keeping previous collection");
                false
            }
        }
    }

    /// Create a book in the store, then reload.
    ///
    /// Any create the store accepted is followed by a reload, whether or not
    /// the store named the new key. A failed create is logged and returned,
    /// and no reload happens.
    pub async fn add(&self, book: NewBook) -> Result<Option<String>, StoreError> {
        match self.store.create(&book).await {
            Ok(id) => {
                match &id {
                    Some(id) => tracing::info!(%id, title = %book.title, "book added"),
                    None => tracing::info!(title = %book.title, "book added"),
                }
                self.reload().await;
                Ok(id)
            }
            Err(e) => {
                tracing::error!(error = %e, title = %book.title, "failed to add book");
                Err(e)
            }
        }
    }

    /// Delete a book from the store, then reload. Returns false if the delete
    /// failed (no reload happens then).
    pub async fn delete(&self, id: &str) -> bool {
        match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "book deleted");
                self.reload().await;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, %id, "failed to delete book");
                false
            }
        }
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        self.catalog.lock().set_search_term(term);
    }

    /// Apply a presentation event. Returns false if a store call failed.
    pub async fn handle(&self, command: Command) -> bool {
        match command {
            Command::Reload => self.reload().await,
            Command::Search(term) => {
                self.set_search_term(term);
                true
            }
            Command::Add(book) => self.add(book).await.is_ok(),
            Command::Delete(id) => self.delete(&id).await,
        }
    }

    /// Run `command` as its own task so the caller stays responsive.
    pub fn spawn(&self, command: Command) -> JoinHandle<bool> {
        let session = self.clone();
        tokio::spawn(async move { session.handle(command).await })
    }

    /// Snapshot of the filtered view.
    pub fn view(&self) -> Vec<BookRecord> {
        self.catalog.lock().view().to_vec()
    }

    /// Snapshot of the full collection.
    pub fn books(&self) -> Vec<BookRecord> {
        self.catalog.lock().books().to_vec()
    }

    pub fn search_term(&self) -> String {
        self.catalog.lock().search_term().to_string()
    }

    /// Number of completed reloads.
    pub fn revision(&self) -> u64 {
        self.catalog.lock().revision()
    }

    /// Register a view listener. Listeners run with the catalog locked and
    /// must not call back into the session.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&[BookRecord]) + Send + Sync + 'static,
    {
        self.catalog.lock().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.catalog.lock().unsubscribe(id)
    }
}
