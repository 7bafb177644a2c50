//! HTTP store - the book collection in a path-addressed JSON document store.
//!
//! Requires the `http` feature. Uses reqwest.
//!
//! ## Routes
//!
//! - `GET {base}/{collection}.json` - the whole collection, `null` when empty.
//! - `POST {base}/{collection}/.json` - body = book fields, answers `{ "name": "<key>" }`.
//! - `DELETE {base}/{collection}/{id}.json` - answers `null`.
//!
//! Any 2xx answer to a POST counts as created; the key is read when present.
//! Record keys are checked with [`check_key`] and percent-encoded before they
//! go into a path.
//!
//! Failures answer with a non-success status and `{ "error": "<message>" }`.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::{check_key, normalize_collection, BookStore};
use crate::book::{BookRecord, NewBook};
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Body of a successful create: the key the store assigned.
#[derive(Debug, Deserialize)]
struct AssignedKey {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`BookStore`] talking JSON over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBookStore {
    base_url: String,
    collection: String,
    client: reqwest::Client,
}

impl HttpBookStore {
    /// Store at `base_url` with no request timeout.
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self::with_client(base_url, collection, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        collection: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let collection = collection.into().trim_matches('/').to_string();
        Self {
            base_url,
            collection,
            client,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        Ok(Self::with_client(
            config.base_url.clone(),
            config.collection.clone(),
            client,
        ))
    }

    pub fn collection_url(&self) -> String {
        format!("{}/{}.json", self.base_url, self.collection)
    }

    pub fn create_url(&self) -> String {
        format!("{}/{}/.json", self.base_url, self.collection)
    }

    /// URL of the single record under `id`, with the key percent-encoded.
    pub fn record_url(&self, id: &str) -> Result<String, StoreError> {
        check_key(id)?;
        let mut url = reqwest::Url::parse(&format!("{}/{}/", self.base_url, self.collection))
            .map_err(|e| StoreError::Transport(format!("bad store url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                StoreError::Transport(format!("store url {} has no path", self.base_url))
            })?
            .pop_if_empty()
            .push(&format!("{}.json", id));
        Ok(url.into())
    }
}

/// Read a response body as text, mapping non-success statuses to errors.
async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error,
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        return Err(StoreError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(body)
}

/// Read a response body as JSON, mapping non-success statuses to errors.
async fn read_json(response: reqwest::Response) -> Result<Value, StoreError> {
    let body = read_body(response).await?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}

impl BookStore for HttpBookStore {
    async fn list_all(&self) -> Result<Vec<BookRecord>, StoreError> {
        let url = self.collection_url();
        tracing::debug!(%url, "fetching collection");

        let response = self.client.get(&url).send().await?;
        let document = read_json(response).await?;
        if document.is_null() {
            tracing::warn!(%url, "store returned no books");
        }
        normalize_collection(document)
    }

    async fn create(&self, book: &NewBook) -> Result<Option<String>, StoreError> {
        let url = self.create_url();
        tracing::debug!(%url, title = %book.title, "creating book");

        let response = self.client.post(&url).json(book).send().await?;
        let body = read_body(response).await?;
        match serde_json::from_str::<AssignedKey>(&body) {
            Ok(assigned) => Ok(Some(assigned.name)),
            Err(e) => {
                tracing::warn!(%url, error = %e, "store accepted the book without naming its key");
                Ok(None)
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.record_url(id)?;
        tracing::debug!(%url, "deleting book");

        let response = self.client.delete(&url).send().await?;
        read_body(response).await?;
        Ok(())
    }
}
