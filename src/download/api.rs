//! Fast download API: endpoint layout and response parsing.

use serde::Deserialize;
use url::Url;

use crate::identifier::Identifier;

/// Header carrying the API key on authenticated calls.
pub const API_KEY_HEADER: &str = "X-Library-Key";

#[derive(Debug, Deserialize)]
struct FastDownloadResponse {
    download_url: Option<String>,
    error: Option<String>,
}

/// Endpoint resolving `identifier` to a fast download URL.
pub(crate) fn fast_download_endpoint(base_url: &str, identifier: &Identifier) -> String {
    format!(
        "{base_url}/dyn/api/fast_download.json?md5={}",
        urlencoding::encode(identifier.as_str())
    )
}

/// Extracts `download_url` from the API body, or explains why it can't.
pub(crate) fn parse_download_url(body: &str) -> Result<Url, String> {
    let response: FastDownloadResponse = serde_json::from_str(body)
        .map_err(|e| format!("download API returned malformed JSON: {e}"))?;

    let url = response
        .download_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    let Some(url) = url else {
        return Err(match response.error {
            Some(error) if !error.trim().is_empty() => {
                format!("download API reported: {}", error.trim())
            }
            _ => "download API response has no download_url".to_string(),
        });
    };

    Url::parse(&url).map_err(|_| format!("download API returned an invalid URL: {url}"))
}
