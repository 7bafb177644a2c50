//! HttpBookStore integration tests.
//!
//! Starts a fake document store with axum and exercises it through the
//! store and the session.

mod support;

use bookshelf::{BookStore, CatalogSession, Command, HttpBookStore, NewBook, StoreError};
use serde_json::json;
use support::{dead_url, start_server, FakeStore, Mode};

async fn store_and_server() -> (HttpBookStore, FakeStore) {
    let fake = FakeStore::new();
    let base = start_server(fake.clone()).await;
    (HttpBookStore::new(base, "books"), fake)
}

#[tokio::test]
async fn empty_collection_lists_as_empty() {
    let (store, _fake) = store_and_server().await;
    let books = store.list_all().await.unwrap();
    assert!(books.is_empty());
}

#[tokio::test]
async fn create_returns_the_server_assigned_key() {
    let (store, fake) = store_and_server().await;

    let book = NewBook::new("Dune", "Frank Herbert")
        .with_year("1965")
        .with_isbn("978-0441013593")
        .with_price("9.99");
    let id = store.create(&book).await.unwrap().unwrap();

    let books = store.list_all().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, id);
    assert_eq!(books[0].fields(), book);
    assert_eq!(fake.books.len(), 1);
}

#[tokio::test]
async fn posted_body_has_no_id() {
    let (store, fake) = store_and_server().await;
    store.create(&NewBook::new("Emma", "Jane Austen")).await.unwrap();

    let document = fake.books.document().unwrap();
    let stored = document.as_object().unwrap().values().next().unwrap();
    assert_eq!(stored, &json!({ "title": "Emma", "author": "Jane Austen" }));
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (store, _fake) = store_and_server().await;
    let keep = store.create(&NewBook::new("Dune", "Herbert")).await.unwrap().unwrap();
    let gone = store.create(&NewBook::new("Emma", "Austen")).await.unwrap().unwrap();

    store.delete(&gone).await.unwrap();

    let ids: Vec<String> = store.list_all().await.unwrap().into_iter().map(|b| b.id).collect();
    assert_eq!(ids, [keep]);
}

#[tokio::test]
async fn deleting_twice_is_harmless() {
    let (store, _fake) = store_and_server().await;
    let id = store.create(&NewBook::new("Dune", "Herbert")).await.unwrap().unwrap();

    store.delete(&id).await.unwrap();
    store.delete(&id).await.unwrap();
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn refusal_surfaces_status_and_message() {
    let (store, fake) = store_and_server().await;
    fake.set_mode(Mode::Deny);

    let err = store.list_all().await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Status {
            status: 401,
            message: "Permission denied".into(),
        }
    );

    let err = store.create(&NewBook::new("Dune", "Herbert")).await.unwrap_err();
    assert!(matches!(err, StoreError::Status { status: 401, .. }));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let (store, fake) = store_and_server().await;
    fake.set_mode(Mode::Garbage);

    let err = store.list_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    let store = HttpBookStore::new(dead_url().await, "books");
    let err = store.list_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

#[tokio::test]
async fn session_reloads_after_each_mutation() {
    let (store, _fake) = store_and_server().await;
    let session = CatalogSession::new(store);
    assert!(session.reload().await);
    assert!(session.books().is_empty());

    let id = session
        .add(NewBook::new("Dune", "Frank Herbert"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.books().len(), 1);
    assert_eq!(session.books()[0].id, id);

    assert!(session.handle(Command::Delete(id.clone())).await);
    assert!(session.books().iter().all(|b| b.id != id));
}

#[tokio::test]
async fn session_keeps_stale_books_while_the_store_refuses() {
    let (store, fake) = store_and_server().await;
    let session = CatalogSession::new(store);
    session.add(NewBook::new("Dune", "Herbert")).await.unwrap();
    let before = session.books();

    fake.set_mode(Mode::Deny);
    assert!(!session.reload().await);
    assert!(session.add(NewBook::new("Emma", "Austen")).await.is_err());
    assert_eq!(session.books(), before);

    fake.set_mode(Mode::Normal);
    assert!(session.reload().await);
    assert_eq!(session.books(), before);
}

#[tokio::test]
async fn keys_outside_the_collection_are_never_sent() {
    let (store, fake) = store_and_server().await;
    store.create(&NewBook::new("Dune", "Herbert")).await.unwrap();
    let before = fake.requests().len();

    for key in ["", "../users", "-Na/title", "x#y", "x?print=silent"] {
        let err = store.delete(key).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey { .. }), "{key:?}: {err:?}");
    }

    assert_eq!(fake.requests().len(), before);
    assert_eq!(fake.books.len(), 1);
}

#[tokio::test]
async fn unusual_keys_are_percent_encoded() {
    let (store, fake) = store_and_server().await;
    store.delete("to be 100%").await.unwrap();
    assert_eq!(
        fake.requests(),
        ["DELETE /books/to%20be%20100%25.json"]
    );
}

#[tokio::test]
async fn create_without_a_key_in_the_answer_still_succeeds() {
    let (store, fake) = store_and_server().await;
    fake.set_mode(Mode::Unkeyed);

    let id = store.create(&NewBook::new("Dune", "Herbert")).await.unwrap();
    assert_eq!(id, None);
    assert_eq!(fake.books.len(), 1);
}

#[tokio::test]
async fn session_reloads_after_an_unkeyed_create() {
    let (store, fake) = store_and_server().await;
    fake.set_mode(Mode::Unkeyed);
    let session = CatalogSession::new(store);
    assert!(session.reload().await);

    let added = session.add(NewBook::new("Dune", "Herbert")).await;
    assert_eq!(added, Ok(None));
    assert_eq!(
        fake.requests(),
        ["GET /books.json", "POST /books/.json", "GET /books.json"]
    );
    assert_eq!(session.books().len(), 1);
    assert_eq!(session.books()[0].title, "Dune");
    assert!(session.handle(Command::Add(NewBook::new("Emma", "Austen"))).await);
    assert_eq!(session.books().len(), 2);
}
