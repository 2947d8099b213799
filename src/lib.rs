//! Library catalog resolution and download core.
//!
//! Given an opaque content identifier (an MD5-like digest) this crate can
//! resolve the catalog entry's metadata and mirror links, and download the
//! file through the authenticated fast download API under a short,
//! identifier-derived name.
//!
//! # Architecture
//!
//! - [`catalog`] - Detail page fetch and metadata extraction
//! - [`download`] - Fast download API, transfer and canonical rename
//! - [`fetch`] - HTTP fetch primitive shared by both
//! - [`config`] - Base URL, API key and timeouts, read once from the environment

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod download;
pub mod error;
pub mod fetch;
pub mod identifier;
mod user_agent;

// Re-export commonly used types
pub use catalog::{BookDetails, DownloadOptions, MetadataResolver};
pub use config::{API_KEY_VAR, ApiKey, BASE_URL_VAR, Config, DEFAULT_BASE_URL};
pub use download::{DownloadExecutor, canonical_name};
pub use error::LibraryError;
pub use fetch::{Fetch, FetchError, HttpFetcher};
pub use identifier::Identifier;
