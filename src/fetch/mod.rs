//! Fetch primitive shared by the catalog resolver and the download executor.
//!
//! [`Fetch`] is the seam both components talk through: text fetches with
//! optional header injection (used for the API key), and streaming of a body
//! straight to disk. [`HttpFetcher`] is the reqwest-backed implementation;
//! tests substitute their own.
//!
//! # Example
//!
//! ```no_run
//! use library_core::fetch::{Fetch, HttpFetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = HttpFetcher::new()?;
//! let page = fetcher
//!     .fetch_text("https://library.example.org/md5/0123abcd", &[])
//!     .await?;
//! println!("{} bytes", page.len());
//! # Ok(())
//! # }
//! ```

mod client;
pub(crate) mod constants;
mod error;

use std::path::Path;

use async_trait::async_trait;

pub use client::HttpFetcher;
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::FetchError;

/// Network access used by the resolver and executor.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches `url` and returns the body decoded as text.
    ///
    /// `headers` are added to the request as-is.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure or a non-success status.
    async fn fetch_text(&self, url: &str, headers: &[(&str, &str)])
    -> Result<String, FetchError>;

    /// Streams the body at `url` into `destination`, returning bytes written.
    ///
    /// `destination` must not exist; an existing file is never truncated.
    /// On failure no file is left at `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, a non-success status, or
    /// a disk failure (including `destination` already existing).
    async fn fetch_to_file(&self, url: &str, destination: &Path) -> Result<u64, FetchError>;
}
