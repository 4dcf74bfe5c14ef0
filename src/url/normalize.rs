use crate::UrlError;
use std::fmt;
use url::Url;

/// A normalized absolute URL used as the identity key for deduplication
///
/// Canonical form is scheme, host, path and query with the fragment removed.
/// The `url` crate already lowercases the host, removes dot segments and
/// turns an empty path into `/`; two raw strings that canonicalize equal are
/// the same page or asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the lowercase host, if any
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns the path component
    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Returns the URL scheme
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Canonicalizes an absolute URL string
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Parse the URL; reject if malformed
/// 3. Reject anything but http and https (`mailto:`, `javascript:`, ...)
/// 4. Reject URLs without a host
/// 5. Remove the fragment
///
/// # Examples
///
/// ```
/// use site_archiver::url::canonicalize;
///
/// let url = canonicalize("HTTP://Example.COM/a/../docs#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/docs");
/// ```
pub fn canonicalize(raw: &str) -> Result<CanonicalUrl, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::NotAUrl(raw.to_string()));
    }

    let url = Url::parse(trimmed).map_err(|e| UrlError::NotAUrl(format!("{}: {}", raw, e)))?;
    from_url(url)
}

/// Resolves a possibly-relative link against the page that contains it
///
/// Standard URL resolution rules apply, so `intro`, `../x`, `/abs` and full
/// URLs all work. Links that do not resolve to an http(s) URL with a host
/// fail with a [`UrlError`]; callers treat that as an unresolvable link.
///
/// # Examples
///
/// ```
/// use site_archiver::url::{canonicalize, resolve};
///
/// let base = canonicalize("http://x.com/docs/").unwrap();
/// assert_eq!(resolve(&base, "intro#setup").unwrap().as_str(), "http://x.com/docs/intro");
/// assert!(resolve(&base, "mailto:someone@x.com").is_err());
/// assert!(resolve(&base, "").is_err());
/// ```
pub fn resolve(base: &CanonicalUrl, raw: &str) -> Result<CanonicalUrl, UrlError> {
    let href = raw.trim();
    if href.is_empty() {
        return Err(UrlError::NotAUrl(raw.to_string()));
    }

    let joined = base
        .as_url()
        .join(href)
        .map_err(|e| UrlError::NotAUrl(format!("{}: {}", raw, e)))?;
    from_url(joined)
}

fn from_url(mut url: Url) -> Result<CanonicalUrl, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(url.to_string()));
    }

    url.set_fragment(None);
    Ok(CanonicalUrl(url))
}
