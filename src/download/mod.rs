//! Fast-path downloads with canonical filenames.
//!
//! [`DownloadExecutor::download`] walks one fixed sequence:
//!
//! 1. check that an API key is configured (no network call otherwise)
//! 2. ask the fast download API for the file URL
//! 3. stream the file into the output directory under the provider's name,
//!    suffixed if a file by that name already exists
//! 4. rename it to [`canonical_name`]
//!
//! Any failure stops the sequence. Files already in the output directory are
//! never written to during the transfer. A partially written file is removed
//! by the fetch primitive; only a completed transfer is ever renamed.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use library_core::download::DownloadExecutor;
//! use library_core::fetch::HttpFetcher;
//! use library_core::{Config, Identifier};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = DownloadExecutor::new(Config::from_env(), Arc::new(HttpFetcher::new()?));
//! let id = Identifier::parse("1065812d567369000ccc1e985e4cadc2")?;
//! let path = executor.download(&id, Path::new("./books")).await?;
//! println!("Saved: {}", path.display());
//! # Ok(())
//! # }
//! ```

mod api;
mod filename;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::{ApiKey, Config};
use crate::error::LibraryError;
use crate::fetch::{Fetch, FetchError};
use crate::identifier::Identifier;

pub use api::API_KEY_HEADER;
pub use filename::{DEFAULT_EXTENSION, canonical_name};

/// Downloads catalog entries through the authenticated fast download API.
pub struct DownloadExecutor {
    config: Config,
    fetcher: Arc<dyn Fetch>,
}

impl DownloadExecutor {
    /// Creates an executor over the given configuration and fetch primitive.
    #[must_use]
    pub fn new(config: Config, fetcher: Arc<dyn Fetch>) -> Self {
        Self { config, fetcher }
    }

    /// Downloads `identifier` into `output_dir` and returns the final path.
    ///
    /// The final file is named `<first 8 chars>.<ext>`; an existing file with
    /// that name is replaced, so repeating a download yields the same path.
    ///
    /// # Errors
    ///
    /// - [`LibraryError::Configuration`] if no API key is configured
    /// - [`LibraryError::Resolution`] if the API gives no usable download URL
    /// - [`LibraryError::Fetch`] on transport failures
    /// - [`LibraryError::Filesystem`] if the file cannot be written or renamed
    #[instrument(skip(self), fields(identifier = %identifier, output_dir = %output_dir.display()))]
    pub async fn download(
        &self,
        identifier: &Identifier,
        output_dir: &Path,
    ) -> Result<PathBuf, LibraryError> {
        let api_key = self.config.require_api_key().inspect_err(|_| {
            warn!("API key missing, not contacting the download API");
        })?;

        let download_url = self.resolve_download_url(identifier, api_key).await?;

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| LibraryError::filesystem(output_dir, e))?;

        let original_name = filename::filename_from_url(&download_url);
        let fetched_path = filename::resolve_unique_path(output_dir, &original_name);
        debug!(url = %download_url, path = %fetched_path.display(), "fetching file");

        self.fetcher
            .fetch_to_file(download_url.as_str(), &fetched_path)
            .await
            .map_err(LibraryError::from_fetch)?;

        let final_path = output_dir.join(canonical_name(identifier, &original_name));
        if fetched_path != final_path {
            tokio::fs::rename(&fetched_path, &final_path)
                .await
                .map_err(|e| {
                    warn!(
                        from = %fetched_path.display(),
                        error = %e,
                        "rename failed, leaving fetched file in place"
                    );
                    LibraryError::filesystem(&final_path, e)
                })?;
        }

        info!(path = %final_path.display(), "download complete");
        Ok(final_path)
    }

    async fn resolve_download_url(
        &self,
        identifier: &Identifier,
        api_key: &ApiKey,
    ) -> Result<Url, LibraryError> {
        let endpoint = api::fast_download_endpoint(self.config.base_url(), identifier);
        debug!(url = %endpoint, "resolving fast download URL");

        let body = match self
            .fetcher
            .fetch_text(&endpoint, &[(API_KEY_HEADER, api_key.expose())])
            .await
        {
            Ok(body) => body,
            Err(FetchError::HttpStatus { status, .. }) => {
                return Err(LibraryError::resolution(
                    identifier.as_str(),
                    format!("download API returned HTTP {status}"),
                ));
            }
            Err(other) => return Err(LibraryError::Fetch(other)),
        };

        api::parse_download_url(&body)
            .map_err(|reason| LibraryError::resolution(identifier.as_str(), reason))
    }
}

impl std::fmt::Debug for DownloadExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadExecutor")
            .field("base_url", &self.config.base_url())
            .field("has_api_key", &self.config.api_key().is_some())
            .finish_non_exhaustive()
    }
}
