//! Filename handling for downloads.
//!
//! Two names matter per transfer: the provider's name, taken from the download
//! URL and used while the body is being written, and the canonical name
//! `<short key>.<ext>` the finished file is renamed to. Providers append their
//! own branding (e.g. `-- Some Provider`) to the first, so nothing but the
//! extension survives into the second.

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::identifier::Identifier;

/// Extension used when the provider's name carries none.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Longest extension accepted from a provider filename.
const MAX_EXTENSION_LEN: usize = 8;

/// Name used when the URL has no usable final path segment.
const FALLBACK_FILENAME: &str = "download";

/// Byte cap for a provider filename. Filesystems allow 255; the rest is room
/// for a uniqueness suffix.
const MAX_FILENAME_BYTES: usize = 240;

/// Highest numeric suffix tried before falling back to the process id.
const MAX_UNIQUE_SUFFIX: usize = 1000;

/// Builds the canonical filename for a finished download.
///
/// The result is `<first 8 chars of identifier>.<ext>`, where `ext` is the
/// lowercase extension of `original_filename`. Anything that isn't a short
/// alphanumeric extension (or no extension at all) becomes
/// [`DEFAULT_EXTENSION`].
///
/// ```
/// use library_core::Identifier;
/// use library_core::download::canonical_name;
///
/// let id = Identifier::parse("1065812d567369000ccc1e985e4cadc2").unwrap();
/// assert_eq!(canonical_name(&id, "The Porn Trap -- Some Provider.PDF"), "1065812d.pdf");
/// assert_eq!(canonical_name(&id, "filename_without_ext"), "1065812d.pdf");
/// ```
#[must_use]
pub fn canonical_name(identifier: &Identifier, original_filename: &str) -> String {
    let prefix = sanitize_key(identifier.short_key());
    let extension =
        extension_of(original_filename).unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{prefix}.{extension}")
}

/// Lowercase extension of `filename` without the dot, when it looks like one.
pub(crate) fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.trim().rsplit_once('.')?;
    if stem.trim().is_empty() {
        return None;
    }
    let plausible = (1..=MAX_EXTENSION_LEN).contains(&ext.len())
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    plausible.then(|| ext.to_ascii_lowercase())
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Filename implied by a download URL: the last path segment, percent-decoded,
/// made safe for the filesystem and cut to [`MAX_FILENAME_BYTES`].
pub(crate) fn filename_from_url(url: &Url) -> String {
    if let Some(mut segments) = url.path_segments()
        && let Some(last) = segments.next_back()
        && !last.is_empty()
    {
        let decoded = urlencoding::decode(last).map_or_else(|_| last.into(), |d| d.into_owned());
        let sanitized = sanitize_filename(&decoded);
        if !sanitized.trim_matches('_').is_empty() {
            return truncate_filename(&sanitized, MAX_FILENAME_BYTES);
        }
    }
    FALLBACK_FILENAME.to_string()
}

/// Shortens `name` to at most `max_bytes` bytes, cutting the stem on a char
/// boundary and keeping a plausible extension intact.
pub(crate) fn truncate_filename(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, _)) if extension_of(name).is_some() => (stem, &name[stem.len()..]),
        _ => (name, ""),
    };
    let mut end = max_bytes.saturating_sub(ext.len()).min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{ext}", stem[..end].trim_end())
}

/// Resolves a path in `dir` that does not exist yet, adding a numeric suffix
/// to the stem (`book.pdf`, `book_1.pdf`, `book_2.pdf`, ...) when needed.
pub(crate) fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let base_path = dir.join(filename);
    if !base_path.exists() {
        return base_path;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 => (&filename[..pos], &filename[pos..]),
        _ => (filename, ""),
    };

    for i in 1..MAX_UNIQUE_SUFFIX {
        let candidate = dir.join(format!("{stem}_{i}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }

    dir.join(format!("{stem}_{}{ext}", std::process::id()))
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}
