//! Test stores: one that can be switched offline, one whose listings are
//! released by hand to script completion order. Also a tracing layer that
//! records events.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use bookshelf::{BookRecord, BookStore, InMemoryBookStore, NewBook, StoreError};

/// Wraps an in-memory store; every call fails while offline.
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: InMemoryBookStore,
    offline: Arc<AtomicBool>,
    pub list_calls: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn with_books(books: impl IntoIterator<Item = NewBook>) -> Self {
        Self {
            inner: InMemoryBookStore::with_books(books),
            ..Self::default()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

impl BookStore for FlakyStore {
    async fn list_all(&self) -> Result<Vec<BookRecord>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.list_all().await
    }

    async fn create(&self, book: &NewBook) -> Result<Option<String>, StoreError> {
        self.check()?;
        self.inner.create(book).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.delete(id).await
    }
}

/// Each `list_all` takes the next queued receiver and answers with whatever
/// the test sends through it.
#[derive(Default)]
pub struct GatedStore {
    gates: Mutex<VecDeque<oneshot::Receiver<Vec<BookRecord>>>>,
}

impl GatedStore {
    /// Queue a gate for the next listing; send on the returned sender to
    /// complete it.
    pub fn gate(&self) -> oneshot::Sender<Vec<BookRecord>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().push_back(rx);
        tx
    }
}

impl BookStore for GatedStore {
    async fn list_all(&self) -> Result<Vec<BookRecord>, StoreError> {
        let gate = self
            .gates
            .lock()
            .pop_front()
            .ok_or_else(|| StoreError::Transport("no gate queued".into()))?;
        gate.await
            .map_err(|_| StoreError::Transport("gate dropped".into()))
    }

    async fn create(&self, _book: &NewBook) -> Result<Option<String>, StoreError> {
        Err(StoreError::Status {
            status: 405,
            message: "read only".into(),
        })
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Status {
            status: 405,
            message: "read only".into(),
        })
    }
}

pub fn book(id: &str, title: &str, author: &str) -> BookRecord {
    NewBook::new(title, author).into_record(id)
}

/// Level and message of every event seen by a [`CaptureLayer`].
#[derive(Clone, Default)]
pub struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedEvents {
    pub fn layer(&self) -> CaptureLayer {
        CaptureLayer(self.clone())
    }

    /// Messages of the events logged at `level`.
    pub fn at(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter(|(seen, _)| *seen == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

pub struct CaptureLayer(CapturedEvents);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = MessageField::default();
        event.record(&mut message);
        let CaptureLayer(CapturedEvents(events)) = self;
        events.lock().push((*event.metadata().level(), message.0));
    }
}

#[derive(Default)]
struct MessageField(String);

impl Visit for MessageField {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}
