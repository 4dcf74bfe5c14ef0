use crate::url::normalize::{canonicalize, CanonicalUrl};
use crate::UrlError;

/// Immutable seed-derived rules for a crawl
///
/// A page is eligible for recursion only when its canonical string starts
/// with the seed's canonical string, which is stricter than same-origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    seed: CanonicalUrl,
    host: String,
}

impl CrawlScope {
    /// Builds a scope from a raw seed URL
    ///
    /// # Examples
    ///
    /// ```
    /// use site_archiver::url::CrawlScope;
    ///
    /// let scope = CrawlScope::from_seed("http://X.com/docs/").unwrap();
    /// assert_eq!(scope.host(), "x.com");
    /// assert_eq!(scope.seed().as_str(), "http://x.com/docs/");
    /// ```
    pub fn from_seed(raw: &str) -> Result<Self, UrlError> {
        let seed = canonicalize(raw)?;
        let host = seed
            .host()
            .map(str::to_string)
            .ok_or_else(|| UrlError::MissingHost(raw.to_string()))?;
        Ok(Self { seed, host })
    }

    /// The canonical seed URL
    pub fn seed(&self) -> &CanonicalUrl {
        &self.seed
    }

    /// The seed's lowercase host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns true if the URL is the seed itself
    pub fn is_seed(&self, url: &CanonicalUrl) -> bool {
        &self.seed == url
    }

    /// Returns true if the URL lives on the seed's host
    pub fn same_host(&self, url: &CanonicalUrl) -> bool {
        url.host() == Some(self.host.as_str())
    }

    /// Returns true if the URL string is prefixed by the seed URL string
    pub fn within_prefix(&self, url: &CanonicalUrl) -> bool {
        url.as_str().starts_with(self.seed.as_str())
    }

    /// Directory name for this crawl's output root
    ///
    /// The seed host, with `_<port>` appended when the seed names a port
    /// explicitly, so two local servers never share a directory.
    pub fn output_dir_name(&self) -> String {
        match self.seed.as_url().port() {
            Some(port) => format!("{}_{}", self.host, port),
            None => self.host.clone(),
        }
    }
}
