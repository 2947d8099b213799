//! Extraction of book details from a catalog detail page.
//!
//! Structured data comes from the first element carrying a `data-content`
//! attribute holding a JSON object. Mirror links are told apart by CSS class
//! only: `download-fast` for the authenticated tier, `download-slow` for the
//! free tier.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{BookDetails, DownloadOptions};

static DATA_BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("[data-content]"));
static FAST_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a.js-download-link.download-fast"));
static SLOW_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("a.js-download-link.download-slow"));
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("title"));

/// Title up to its last spaced separator (` - `, ` – `, ` — `, ` | `).
static TITLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?s)^(.*\S)\s+[-–—|]\s+\S.*$"));

/// Compiles a selector at static init; panics on invalid pattern.
fn compile_static_selector(pattern: &str) -> Selector {
    Selector::parse(pattern).unwrap_or_else(|e| panic!("invalid static selector '{pattern}': {e}"))
}

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// What a page yielded. Both variants collapse into [`BookDetails`].
#[derive(Debug)]
pub(crate) enum PageExtract {
    /// Structured block found: descriptive fields plus both mirror groups.
    Full {
        record: CatalogRecord,
        fast: Vec<String>,
        slow: Vec<String>,
    },
    /// No usable block: the cleaned page title only.
    Fallback { title: String },
}

impl PageExtract {
    pub(crate) fn into_details(self) -> BookDetails {
        match self {
            Self::Full { record, fast, slow } => BookDetails {
                title: record.title,
                author: record.author,
                publisher: record.publisher,
                year: record.year,
                language: record.language,
                format: record.extension,
                size: record.filesize,
                download_options: DownloadOptions { fast, slow },
            },
            Self::Fallback { title } => BookDetails {
                title,
                author: None,
                publisher: None,
                year: None,
                language: None,
                format: None,
                size: None,
                download_options: DownloadOptions::default(),
            },
        }
    }
}

/// Descriptive fields from the structured block, already cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CatalogRecord {
    pub(crate) title: String,
    pub(crate) author: Option<String>,
    pub(crate) publisher: Option<String>,
    pub(crate) year: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) extension: Option<String>,
    pub(crate) filesize: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    title: Option<String>,
    author: Option<String>,
    publisher: Option<String>,
    // Some pages emit the year as a number.
    year: Option<Value>,
    language: Option<String>,
    extension: Option<String>,
    filesize: Option<String>,
}

impl RawRecord {
    fn into_record(self) -> Option<CatalogRecord> {
        let title = clean(self.title)?;
        let year = match self.year {
            Some(Value::String(s)) => clean(Some(s)),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Some(CatalogRecord {
            title,
            author: clean(self.author),
            publisher: clean(self.publisher),
            year,
            language: clean(self.language),
            extension: clean(self.extension).map(|e| e.to_ascii_lowercase()),
            filesize: clean(self.filesize),
        })
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| collapse_whitespace(&v))
        .filter(|v| !v.is_empty())
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts details from `html`, resolving relative links against `page_url`.
///
/// Returns `None` only when the page has neither a usable structured block
/// nor a non-empty `<title>`.
pub(crate) fn extract_page(html: &str, page_url: &Url) -> Option<PageExtract> {
    let document = Html::parse_document(html);

    if let Some(record) = find_record(&document) {
        let fast = collect_links(&document, &FAST_LINK_SELECTOR, page_url);
        let slow = collect_links(&document, &SLOW_LINK_SELECTOR, page_url);
        debug!(
            fast = fast.len(),
            slow = slow.len(),
            "structured block found"
        );
        return Some(PageExtract::Full { record, fast, slow });
    }

    debug!("no structured block, falling back to page title");
    page_title(&document).map(|title| PageExtract::Fallback { title })
}

fn find_record(document: &Html) -> Option<CatalogRecord> {
    document.select(&DATA_BLOCK_SELECTOR).find_map(|element| {
        let raw = element.value().attr("data-content")?;
        match serde_json::from_str::<RawRecord>(raw) {
            Ok(parsed) => parsed.into_record(),
            Err(error) => {
                debug!(error = %error, "ignoring unparsable data-content block");
                None
            }
        }
    })
}

fn page_title(document: &Html) -> Option<String> {
    let raw = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))?;
    if raw.is_empty() {
        return None;
    }
    Some(strip_site_suffix(&raw))
}

/// Removes a trailing ` - Site` style segment, keeping the raw title if
/// nothing would be left.
pub(crate) fn strip_site_suffix(title: &str) -> String {
    TITLE_SUFFIX_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|head| head.as_str().trim())
        .filter(|head| !head.is_empty())
        .unwrap_or(title)
        .to_string()
}

fn collect_links(document: &Html, selector: &Selector, page_url: &Url) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for element in document.select(selector) {
        let Some(href) = element.value().attr("href").map(str::trim) else {
            continue;
        };
        if is_pseudo_link(href) {
            continue;
        }
        let Some(absolute) = absolutize_url(href, page_url) else {
            continue;
        };
        if !links.contains(&absolute) {
            links.push(absolute);
        }
    }
    links
}

fn is_pseudo_link(href: &str) -> bool {
    href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:")
}

/// Resolves a possibly relative href against the page URL.
///
/// Returns the value as-is if it already starts with `http://` or `https://`;
/// otherwise joins with `base_url`, so `//host/...` takes the page's scheme.
fn absolutize_url(value: &str, base_url: &Url) -> Option<String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    base_url.join(value).ok().map(|url| url.to_string())
}
