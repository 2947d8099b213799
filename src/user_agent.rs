//! User-Agent string shared by catalog, API and download requests.

/// Tool description appended after the name/version token.
const UA_DESCRIPTION: &str = "book-retrieval-tool";

/// Default User-Agent for every request the tool sends.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("library-dl/{version} ({UA_DESCRIPTION})")
}
