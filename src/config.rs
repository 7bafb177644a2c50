//! Configuration file handling.
//!
//! ```toml
//! [store]
//! base_url = "https://my-shelf.firebasedatabase.app"
//! collection = "books"
//! timeout_secs = 10        # optional, no timeout when absent
//!
//! [grid]
//! max_column_width = 32
//! ```
//!
//! A missing file yields the defaults. Command-line flags override file values.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000";
pub const DEFAULT_COLLECTION: &str = "books";

#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(e) => write!(f, "failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookshelfConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub grid: GridConfig,
}

/// Where the book collection lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the collection path under `base_url`.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Request timeout in seconds. Requests never time out when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cells wider than this are truncated with an ellipsis.
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_max_column_width() -> usize {
    32
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            collection: default_collection(),
            timeout_secs: None,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            max_column_width: default_max_column_width(),
        }
    }
}

impl BookshelfConfig {
    /// Load configuration from `path`, or the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(ConfigError::Parse)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, base_url: Option<String>, collection: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.store.base_url = url;
        }
        if let Some(collection) = collection {
            self.store.collection = collection;
        }
        self
    }
}
