//! Catalog metadata resolution.
//!
//! [`MetadataResolver`] fetches the catalog detail page for an identifier and
//! turns it into [`BookDetails`]: descriptive fields and two mirror groups when
//! the page carries its structured data block, or just the cleaned page title
//! when it does not. It never downloads anything.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use library_core::catalog::MetadataResolver;
//! use library_core::fetch::HttpFetcher;
//! use library_core::{Config, Identifier};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = MetadataResolver::new(Config::from_env(), Arc::new(HttpFetcher::new()?));
//! let id = Identifier::parse("1065812d567369000ccc1e985e4cadc2")?;
//! let details = resolver.resolve(&id).await?;
//! println!("{} ({} fast mirrors)", details.title, details.download_options.fast.len());
//! # Ok(())
//! # }
//! ```

mod page;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::Config;
use crate::error::LibraryError;
use crate::fetch::{Fetch, FetchError};
use crate::identifier::Identifier;

/// Human-readable metadata and candidate mirrors for one catalog entry.
///
/// `title` is never empty. Descriptive fields are `None` when the page had no
/// structured data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDetails {
    /// Book title.
    pub title: String,
    /// Author(s) as printed by the catalog.
    pub author: Option<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Publication year.
    pub year: Option<String>,
    /// Language name.
    pub language: Option<String>,
    /// Lowercase file format, e.g. `pdf` or `epub`.
    pub format: Option<String>,
    /// Human-readable file size.
    pub size: Option<String>,
    /// Candidate mirrors.
    pub download_options: DownloadOptions,
}

/// Mirror links grouped by access tier, in page order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DownloadOptions {
    /// Authenticated (paid) tier links.
    pub fast: Vec<String>,
    /// Free tier links.
    pub slow: Vec<String>,
}

/// Resolves catalog detail pages into [`BookDetails`].
pub struct MetadataResolver {
    config: Config,
    fetcher: Arc<dyn Fetch>,
}

impl MetadataResolver {
    /// Creates a resolver over the given configuration and fetch primitive.
    #[must_use]
    pub fn new(config: Config, fetcher: Arc<dyn Fetch>) -> Self {
        Self { config, fetcher }
    }

    /// Detail page URL for `identifier`.
    #[must_use]
    pub fn page_url(&self, identifier: &Identifier) -> String {
        format!(
            "{}/md5/{}",
            self.config.base_url(),
            urlencoding::encode(identifier.as_str())
        )
    }

    /// Fetches and extracts the detail page for `identifier`.
    ///
    /// Missing or broken structured data is not an error: the page title is
    /// used and both mirror groups are empty.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Fetch`] if the page cannot be fetched
    /// - [`LibraryError::Parse`] if the page has no usable title at all
    #[instrument(skip(self), fields(identifier = %identifier))]
    pub async fn resolve(&self, identifier: &Identifier) -> Result<BookDetails, LibraryError> {
        let page_url = self.page_url(identifier);
        let parsed_url =
            Url::parse(&page_url).map_err(|_| FetchError::invalid_url(page_url.clone()))?;

        debug!(url = %page_url, "fetching catalog page");
        let html = self.fetcher.fetch_text(&page_url, &[]).await?;

        let extract = page::extract_page(&html, &parsed_url).ok_or_else(|| {
            LibraryError::parse(&page_url, "no structured data block and no page title")
        })?;
        let details = extract.into_details();

        info!(
            title = %details.title,
            fast = details.download_options.fast.len(),
            slow = details.download_options.slow.len(),
            "resolved book details"
        );
        Ok(details)
    }
}

impl std::fmt::Debug for MetadataResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataResolver")
            .field("base_url", &self.config.base_url())
            .finish_non_exhaustive()
    }
}
