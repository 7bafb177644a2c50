//! Book catalog manager over a path-addressed JSON document store.
//!
//! Three pieces form a loop: a [`BookStore`] reads and writes the remote
//! collection, a [`Catalog`] caches the last fetched collection for the
//! session, and [`filter_books`] derives the view shown in the [`Grid`].
//! [`CatalogSession`] ties them together and reloads the whole collection
//! after every mutation.

pub mod book;
pub mod catalog;
pub mod command;
pub mod config;
mod error;
pub mod grid;
pub mod logging;
pub mod session;
pub mod shell;
pub mod store;

pub use book::{BookRecord, NewBook};
pub use catalog::{filter_books, matches_term, Catalog, SubscriptionId};
pub use command::{parse_line, ShellCommand};
pub use config::{BookshelfConfig, ConfigError, GridConfig, StoreConfig};
pub use error::StoreError;
pub use grid::{
    book_actions, book_columns, ColumnDef, ColumnFilter, Grid, GridError, RowAction, RowActions,
    SortDirection, SortSpec,
};
pub use session::{CatalogSession, Command};
pub use store::{check_key, normalize_collection, BookStore, InMemoryBookStore};

#[cfg(feature = "http")]
pub use store::http::HttpBookStore;
