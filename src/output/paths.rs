use crate::url::{CanonicalUrl, CrawlScope};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// File the seed page is saved to
pub const INDEX_FILE: &str = "index.html";

/// Subdirectory of the output root that holds downloaded assets
pub const ASSET_DIR: &str = "pdfs";

/// Fallback name for an asset whose URL has no usable last segment
const FALLBACK_ASSET_NAME: &str = "download.pdf";

/// Longest file name written, safely below the common 255-byte limit
pub const MAX_FILE_NAME_LEN: usize = 200;

/// Suffixes up to this many bytes (dot included) survive shortening
const MAX_EXTENSION_LEN: usize = 8;

/// Hex digits of the name hash appended to shortened names
const NAME_HASH_LEN: usize = 16;

/// Maps an in-scope page URL to its path relative to the output root
///
/// # Mapping Rules
///
/// 1. The seed URL maps to `index.html`
/// 2. Otherwise take the path component (query is not part of it) and strip
///    leading and trailing slashes
/// 3. Replace every character outside `[A-Za-z0-9_.-]` with `_`
/// 4. Append `.html` unless already present
/// 5. An empty result maps to `index.html`
/// 6. Names longer than [`MAX_FILE_NAME_LEN`] are shortened to a
///    truncated stem plus a hash of the full name
///
/// The mapping is deterministic but not injective: `/a/b` and `/a_b` both
/// land on `a_b.html`, and whichever is saved last wins.
///
/// # Examples
///
/// ```
/// use site_archiver::output::map_to_path;
/// use site_archiver::url::{canonicalize, CrawlScope};
///
/// let scope = CrawlScope::from_seed("http://x.com/docs/").unwrap();
/// let page = canonicalize("http://x.com/docs/intro?ref=1").unwrap();
/// assert_eq!(map_to_path(&scope, &page).to_str(), Some("docs_intro.html"));
/// ```
pub fn map_to_path(scope: &CrawlScope, url: &CanonicalUrl) -> PathBuf {
    if scope.is_seed(url) {
        return PathBuf::from(INDEX_FILE);
    }

    let mut name = sanitize(url.path().trim_matches('/'));
    if name.is_empty() {
        return PathBuf::from(INDEX_FILE);
    }

    if !name.ends_with(".html") {
        name.push_str(".html");
    }

    PathBuf::from(cap_length(name))
}

/// Maps an asset URL to its path relative to the output root
///
/// The last path segment is sanitized and length-capped like page paths and
/// placed under [`ASSET_DIR`].
pub fn asset_path(url: &CanonicalUrl) -> PathBuf {
    let last_segment = url
        .as_url()
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    let name = sanitize(last_segment);
    let name = if name.is_empty() {
        FALLBACK_ASSET_NAME.to_string()
    } else {
        name
    };

    PathBuf::from(ASSET_DIR).join(cap_length(name))
}

/// Shortens a sanitized file name to at most [`MAX_FILE_NAME_LEN`] bytes
///
/// Long names keep a truncated stem, then `-` and the first 16 hex digits
/// of the SHA-256 of the full name, then the original extension. Distinct
/// long names sharing a prefix therefore still get distinct files.
fn cap_length(name: String) -> String {
    if name.len() <= MAX_FILE_NAME_LEN {
        return name;
    }

    // Sanitized names are ASCII, so every byte index is a char boundary
    let extension = match name.rfind('.') {
        Some(dot) if name.len() - dot <= MAX_EXTENSION_LEN => &name[dot..],
        _ => "",
    };
    let digest = hex::encode(Sha256::digest(name.as_bytes()));
    let stem_len = MAX_FILE_NAME_LEN - extension.len() - NAME_HASH_LEN - 1;

    format!(
        "{}-{}{}",
        &name[..stem_len],
        &digest[..NAME_HASH_LEN],
        extension
    )
}

/// Replaces every character outside `[A-Za-z0-9_.-]` with `_`
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
