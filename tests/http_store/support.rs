//! A fake document store: the book collection served over HTTP by axum,
//! backed by an `InMemoryBookStore`.

use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use bookshelf::{InMemoryBookStore, NewBook};

/// How the fake store answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Every request is refused with 401, as a locked-down database would.
    Deny,
    /// Every request answers 200 with a non-JSON body.
    Garbage,
    /// Creates are stored but answered with `{}` instead of the new key.
    Unkeyed,
}

#[derive(Clone)]
pub struct FakeStore {
    pub books: InMemoryBookStore,
    mode: Arc<Mutex<Mode>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            books: InMemoryBookStore::new(),
            mode: Arc::new(Mutex::new(Mode::Normal)),
            requests: Arc::default(),
        }
    }

    /// Every request received so far, as "METHOD /path".
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn set_mode(&self, mode: Mode) {
        *self.mode.lock() = mode;
    }

    fn refuse(&self) -> Option<Response> {
        match *self.mode.lock() {
            Mode::Normal | Mode::Unkeyed => None,
            Mode::Deny => Some(
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "error": "Permission denied" })),
                )
                    .into_response(),
            ),
            Mode::Garbage => Some((StatusCode::OK, "<html>maintenance</html>").into_response()),
        }
    }
}

async fn list(State(store): State<FakeStore>) -> Response {
    if let Some(refusal) = store.refuse() {
        return refusal;
    }
    Json(store.books.document().unwrap()).into_response()
}

async fn create(State(store): State<FakeStore>, Json(body): Json<Value>) -> Response {
    if let Some(refusal) = store.refuse() {
        return refusal;
    }
    let book: NewBook = serde_json::from_value(body).unwrap();
    let name = store.books.insert(book).unwrap();
    if *store.mode.lock() == Mode::Unkeyed {
        return Json(json!({})).into_response();
    }
    Json(json!({ "name": name })).into_response()
}

async fn remove(State(store): State<FakeStore>, Path(file): Path<String>) -> Response {
    if let Some(refusal) = store.refuse() {
        return refusal;
    }
    let Some(id) = file.strip_suffix(".json") else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "missing .json" })))
            .into_response();
    };
    store.books.remove(id).unwrap();
    Json(Value::Null).into_response()
}

async fn record(State(store): State<FakeStore>, request: Request, next: Next) -> Response {
    store
        .requests
        .lock()
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

/// A path-addressed store deletes the whole node; so does this one.
async fn remove_collection(State(store): State<FakeStore>) -> Response {
    if let Some(refusal) = store.refuse() {
        return refusal;
    }
    for book in store.books.records().unwrap() {
        store.books.remove(&book.id).unwrap();
    }
    Json(Value::Null).into_response()
}

pub fn router(store: FakeStore) -> Router {
    Router::new()
        .route("/books.json", get(list))
        .route("/books/.json", post(create).delete(remove_collection))
        .route("/books/:file", delete(remove))
        .layer(middleware::from_fn_with_state(store.clone(), record))
        .with_state(store)
}

/// Bind to port 0 and return the base URL.
pub async fn start_server(store: FakeStore) -> String {
    let app = router(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
