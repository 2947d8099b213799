//! Error taxonomy shared by the catalog resolver and the download executor.
//!
//! Messages follow a "what failed" line, optionally followed by an indented
//! `Suggestion:` line when the user can do something about it.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::API_KEY_VAR;
use crate::fetch::FetchError;

/// Errors surfaced by [`MetadataResolver`](crate::catalog::MetadataResolver)
/// and [`DownloadExecutor`](crate::download::DownloadExecutor).
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The identifier is empty or cannot be embedded into a URL/filename.
    #[error("invalid identifier '{input}': {reason}")]
    InvalidIdentifier {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A required credential is not configured.
    #[error("{variable} not set\n  Suggestion: {suggestion}")]
    Configuration {
        /// The environment variable that must be set.
        variable: &'static str,
        /// Literal example of setting it.
        suggestion: String,
    },

    /// The catalog, API or download host could not be reached.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The catalog page yielded neither structured data nor a title.
    #[error("could not parse catalog page {url}: {reason}")]
    Parse {
        /// The page URL.
        url: String,
        /// What was missing.
        reason: String,
    },

    /// The download API answered without a usable download URL.
    #[error(
        "no usable download URL for {identifier}: {reason}\n  Suggestion: run `library-dl info {identifier}` to list alternative mirrors"
    )]
    Resolution {
        /// The identifier being resolved.
        identifier: String,
        /// Why the response was unusable.
        reason: String,
    },

    /// Creating, writing or renaming a file failed.
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        /// The path involved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl LibraryError {
    /// Creates an invalid identifier error.
    pub fn invalid_identifier(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidIdentifier {
            input: input.into(),
            reason,
        }
    }

    /// Creates the missing API key error, naming the variable and how to set it.
    #[must_use]
    pub fn missing_api_key() -> Self {
        Self::Configuration {
            variable: API_KEY_VAR,
            suggestion: format!("export {API_KEY_VAR}=\"your-key-here\""),
        }
    }

    /// Creates a page parse error.
    pub fn parse(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a download URL resolution error.
    pub fn resolution(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Creates a filesystem error.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Folds a fetch failure into the taxonomy, treating disk errors as
    /// filesystem errors rather than transport errors.
    #[must_use]
    pub fn from_fetch(error: FetchError) -> Self {
        match error {
            FetchError::Io { path, source } => Self::filesystem(path, source),
            other => Self::Fetch(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_names_variable_and_example() {
        let msg = LibraryError::missing_api_key().to_string();
        assert!(msg.contains("LIBRARY_KEY not set"), "Expected variable in: {msg}");
        assert!(
            msg.contains(r#"export LIBRARY_KEY="your-key-here""#),
            "Expected literal example in: {msg}"
        );
    }

    #[test]
    fn test_resolution_error_suggests_info_command() {
        let msg = LibraryError::resolution("1065812d", "missing download_url").to_string();
        assert!(msg.contains("1065812d"));
        assert!(msg.contains("missing download_url"));
        assert!(msg.contains("library-dl info 1065812d"));
    }

    #[test]
    fn test_from_fetch_maps_io_to_filesystem() {
        let io_error = std::io::Error::new(std::io::ErrorKind::StorageFull, "disk full");
        let error = LibraryError::from_fetch(FetchError::io("/tmp/out/book.pdf", io_error));
        assert!(matches!(error, LibraryError::Filesystem { .. }));

        let error = LibraryError::from_fetch(FetchError::http_status("https://x.test/a", 500));
        assert!(matches!(
            error,
            LibraryError::Fetch(FetchError::HttpStatus { status: 500, .. })
        ));
    }
}
