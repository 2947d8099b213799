//! Error types for the fetch primitive.
//!
//! Every variant carries the URL (or path) it failed on so callers can
//! report failures without threading extra context around.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching a page or streaming a file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error while streaming a body to disk.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a network or timeout error, depending on what reqwest reports.
    pub fn from_transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::network(url, source)
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// url or path, which the source errors don't carry.
