//! Process configuration: catalog host, API key and HTTP timeouts.
//!
//! The environment is read exactly once, in [`Config::from_env`]. Everything
//! else receives a constructed [`Config`], so tests can build one directly or
//! through [`Config::from_lookup`] without touching process state.

use std::fmt;

use crate::error::LibraryError;
use crate::fetch::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Environment variable overriding the catalog host.
pub const BASE_URL_VAR: &str = "LIBRARY_BASE_URL";

/// Environment variable holding the fast download API key.
pub const API_KEY_VAR: &str = "LIBRARY_KEY";

/// Catalog host used when [`BASE_URL_VAR`] is unset or empty.
pub const DEFAULT_BASE_URL: &str = "https://library.example.org";

/// API key for the fast download endpoint. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key, returning `None` for empty or whitespace-only input.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    /// The raw key, for the request header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Configuration shared by the resolver and the executor.
#[derive(Debug, Clone)]
pub struct Config {
    base_url: String,
    api_key: Option<ApiKey>,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
}

impl Config {
    /// Builds a configuration from explicit values.
    ///
    /// `base_url` is trimmed of trailing slashes; an empty value falls back to
    /// [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn new(base_url: Option<&str>, api_key: Option<&str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            api_key: api_key.and_then(ApiKey::new),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }

    /// Reads [`BASE_URL_VAR`] and [`API_KEY_VAR`] from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR);
        let api_key = lookup(API_KEY_VAR);
        Self::new(base_url.as_deref(), api_key.as_deref())
    }

    /// Replaces the catalog host (CLI override).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(Some(base_url));
        self
    }

    /// Replaces the HTTP timeouts (CLI override).
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        self.connect_timeout_secs = connect_timeout_secs;
        self.read_timeout_secs = read_timeout_secs;
        self
    }

    /// Catalog host without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The API key, if configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    /// The API key, or the configuration error telling the user how to set it.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Configuration`] when no key is configured.
    pub fn require_api_key(&self) -> Result<&ApiKey, LibraryError> {
        self.api_key.as_ref().ok_or_else(LibraryError::missing_api_key)
    }

    /// HTTP connect timeout in seconds.
    #[must_use]
    pub fn connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs
    }

    /// HTTP read timeout in seconds.
    #[must_use]
    pub fn read_timeout_secs(&self) -> u64 {
        self.read_timeout_secs
    }
}

fn normalize_base_url(value: Option<&str>) -> String {
    let trimmed = value.map_or("", |v| v.trim().trim_end_matches('/'));
    if trimmed.is_empty() {
        DEFAULT_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
