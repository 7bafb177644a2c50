//! Book records as stored remotely and as held in the session cache.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The field set of a book without its identifier.
///
/// This is both the body posted on create and the value stored under each
/// key of the remote collection. `year`, `isbn` and `price` are passed
/// through untouched; only `title` and `author` are read by the filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub year: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub isbn: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub price: Value,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn with_year(mut self, year: impl Into<Value>) -> Self {
        self.year = year.into();
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<Value>) -> Self {
        self.isbn = isbn.into();
        self
    }

    pub fn with_price(mut self, price: impl Into<Value>) -> Self {
        self.price = price.into();
        self
    }

    /// Attach the identifier the store assigned to this field set.
    pub fn into_record(self, id: impl Into<String>) -> BookRecord {
        BookRecord {
            id: id.into(),
            title: self.title,
            author: self.author,
            year: self.year,
            isbn: self.isbn,
            price: self.price,
        }
    }
}

/// One book of the collection, keyed by the identifier the store assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub year: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub isbn: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub price: Value,
}

impl BookRecord {
    /// Look up a field by its column name. Unknown names yield `None`.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.clone())),
            "title" => Some(Value::String(self.title.clone())),
            "author" => Some(Value::String(self.author.clone())),
            "year" => Some(self.year.clone()),
            "isbn" => Some(self.isbn.clone()),
            "price" => Some(self.price.clone()),
            _ => None,
        }
    }

    /// Display text of a field: strings verbatim, `null` as empty.
    pub fn cell_text(&self, name: &str) -> String {
        match self.field(name) {
            Some(value) => value_text(&value),
            None => String::new(),
        }
    }

    /// Strip the identifier, e.g. to re-submit the same fields.
    pub fn fields(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year.clone(),
            isbn: self.isbn.clone(),
            price: self.price.clone(),
        }
    }
}

pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
