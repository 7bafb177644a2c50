//! Catalog - the session cache of the remote collection and its filtered view.
//!
//! The catalog holds the last collection fetched from the store, the current
//! search term, and the view derived from both. The view is recomputed, and
//! subscribers notified, whenever either input changes. Nothing else mutates
//! it: records are never patched locally.

mod filter;
mod subscription;

use crate::book::BookRecord;

pub use filter::{filter_books, matches_term};
pub use subscription::{Subscribers, SubscriptionId};

/// Session-lived catalog state.
#[derive(Default)]
pub struct Catalog {
    books: Vec<BookRecord>,
    search_term: String,
    view: Vec<BookRecord>,
    revision: u64,
    subscribers: Subscribers,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full collection from the most recently completed reload.
    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    /// The collection filtered by the current search term.
    pub fn view(&self) -> &[BookRecord] {
        &self.view
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Number of completed reloads applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Look up a record of the full collection by id.
    pub fn get(&self, id: &str) -> Option<&BookRecord> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Replace the collection wholesale with a freshly fetched one.
    pub fn replace_collection(&mut self, books: Vec<BookRecord>) {
        self.books = books;
        self.revision += 1;
        self.recompute();
    }

    /// Change the search term. Setting the same term again is a no-op.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term == self.search_term {
            return;
        }
        self.search_term = term;
        self.recompute();
    }

    /// Register a listener for view changes. Listeners run while the catalog
    /// is borrowed and must not reach back into it.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&[BookRecord]) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn recompute(&mut self) {
        self.view = filter_books(&self.books, &self.search_term);
        self.subscribers.notify(&self.view);
    }
}
