//! reqwest-backed implementation of the fetch primitive.
//!
//! Handles header injection for authenticated calls and streams download
//! bodies to disk through a buffered writer. Destinations must not exist yet.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::{Fetch, FetchError};
use crate::user_agent;

/// HTTP fetcher with connection pooling and fixed timeouts.
///
/// Create once and reuse it for the catalog page, the API call and the file
/// transfer.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes (for large files)
    /// - Gzip decompression: enabled
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend cannot be set up.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a fetcher with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend cannot be set up.
    #[instrument(level = "debug")]
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<reqwest::Response, FetchError> {
        Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    // Header values are skipped: they carry the API key.
    #[instrument(skip(self, headers), fields(url = %url, headers = headers.len()))]
    async fn fetch_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, FetchError> {
        let response = self.send(url, headers).await?;
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_transport(url, e))?;
        debug!(bytes = body.len(), "fetched text body");
        Ok(body)
    }

    #[instrument(skip(self), fields(url = %url, path = %destination.display()))]
    async fn fetch_to_file(&self, url: &str, destination: &Path) -> Result<u64, FetchError> {
        let response = self.send(url, &[]).await?;

        // Never opens an existing file, so cleanup only ever removes our own.
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .await
            .map_err(|e| FetchError::io(destination, e))?;

        let stream_result = stream_to_file(&mut file, response, url, destination).await;
        drop(file);

        if stream_result.is_err() {
            debug!("cleaning up partial file after error");
            let _ = tokio::fs::remove_file(destination).await;
        }

        let bytes_written = stream_result?;
        info!(bytes = bytes_written, "transfer complete");
        Ok(bytes_written)
    }
}

/// Streams response body to file, returning bytes written.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, FetchError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::from_transport(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| FetchError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| FetchError::io(file_path, e))?;

    Ok(bytes_written)
}
