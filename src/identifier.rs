//! Catalog entry identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::LibraryError;

/// Number of leading characters used as the stable short key.
pub const SHORT_KEY_LEN: usize = 8;

/// Opaque, case-insensitive digest naming one catalog entry.
///
/// Stored trimmed and lowercased, so two spellings of the same digest compare
/// equal and produce the same short key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Parses an identifier.
    ///
    /// Only non-emptiness is required of the digest itself; whitespace, control
    /// characters and path separators are rejected because the value is
    /// embedded into URLs and filenames.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::InvalidIdentifier`] for empty or unusable input.
    pub fn parse(input: &str) -> Result<Self, LibraryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LibraryError::invalid_identifier(input, "identifier is empty"));
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\'))
        {
            return Err(LibraryError::invalid_identifier(
                input,
                "identifier must not contain whitespace or path separators",
            ));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// The full normalized identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first [`SHORT_KEY_LEN`] characters, or the whole identifier when shorter.
    #[must_use]
    pub fn short_key(&self) -> &str {
        match self.0.char_indices().nth(SHORT_KEY_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl FromStr for Identifier {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
