//! URL handling module for Site-Archiver
//!
//! This module provides URL canonicalization, link resolution, the crawl
//! scope, and link classification.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::{canonicalize, resolve, CanonicalUrl};
pub use scope::CrawlScope;

/// Link classification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// Page under the seed prefix - should be archived
    InScopePage,
    /// PDF on the seed host - should be downloaded, never recursed into
    PdfAsset,
    /// Anything else - discarded
    OutOfScope,
}

/// Classifies a resolved link against the crawl scope
///
/// Checked in the following priority order:
/// 1. PDF asset: path ends in `.pdf` (any case) and the host is the seed host
/// 2. In-scope page: http(s), seed host, and prefixed by the seed URL string
/// 3. Out of scope (default)
///
/// A PDF never classifies as a page, even below the seed prefix, and a PDF
/// on the seed host is an asset even outside the prefix.
///
/// # Examples
///
/// ```
/// use site_archiver::url::{canonicalize, classify, CrawlScope, LinkClass};
///
/// let scope = CrawlScope::from_seed("http://x.com/docs/").unwrap();
/// let intro = canonicalize("http://x.com/docs/intro").unwrap();
/// let blog = canonicalize("http://x.com/blog/post").unwrap();
/// assert_eq!(classify(&scope, &intro), LinkClass::InScopePage);
/// assert_eq!(classify(&scope, &blog), LinkClass::OutOfScope);
/// ```
pub fn classify(scope: &CrawlScope, url: &CanonicalUrl) -> LinkClass {
    if !scope.same_host(url) {
        return LinkClass::OutOfScope;
    }

    // Priority 1: PDF assets
    if url.path().to_ascii_lowercase().ends_with(".pdf") {
        return LinkClass::PdfAsset;
    }

    // Priority 2: pages beneath the seed
    let web_scheme = url.scheme() == "http" || url.scheme() == "https";
    if web_scheme && scope.within_prefix(url) {
        return LinkClass::InScopePage;
    }

    LinkClass::OutOfScope
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> CrawlScope {
        CrawlScope::from_seed("http://x.com/docs/").unwrap()
    }

    fn class_of(raw: &str) -> LinkClass {
        classify(&scope(), &canonicalize(raw).unwrap())
    }

    #[test]
    fn test_page_under_prefix() {
        assert_eq!(class_of("http://x.com/docs/intro"), LinkClass::InScopePage);
        assert_eq!(
            class_of("http://x.com/docs/a/b?page=2"),
            LinkClass::InScopePage
        );
    }

    #[test]
    fn test_seed_itself_in_scope() {
        assert_eq!(class_of("http://x.com/docs/"), LinkClass::InScopePage);
    }

    #[test]
    fn test_sibling_path_out_of_scope() {
        assert_eq!(class_of("http://x.com/blog/post"), LinkClass::OutOfScope);
        assert_eq!(class_of("http://x.com/docs"), LinkClass::OutOfScope);
    }

    #[test]
    fn test_other_host_out_of_scope() {
        assert_eq!(class_of("http://other.com/docs/x"), LinkClass::OutOfScope);
        assert_eq!(class_of("http://sub.x.com/docs/x"), LinkClass::OutOfScope);
    }

    #[test]
    fn test_scheme_change_out_of_scope() {
        assert_eq!(class_of("https://x.com/docs/intro"), LinkClass::OutOfScope);
    }

    #[test]
    fn test_pdf_is_asset() {
        assert_eq!(class_of("http://x.com/docs/report.pdf"), LinkClass::PdfAsset);
        assert_eq!(class_of("http://x.com/docs/REPORT.PDF"), LinkClass::PdfAsset);
    }

    #[test]
    fn test_pdf_outside_prefix_still_asset() {
        assert_eq!(class_of("http://x.com/files/a.pdf"), LinkClass::PdfAsset);
        assert_eq!(class_of("https://x.com/files/a.pdf"), LinkClass::PdfAsset);
    }

    #[test]
    fn test_cross_origin_pdf_ignored() {
        assert_eq!(class_of("http://other.com/docs/a.pdf"), LinkClass::OutOfScope);
    }

    #[test]
    fn test_pdf_query_is_not_path() {
        assert_eq!(
            class_of("http://x.com/docs/view?file=a.pdf"),
            LinkClass::InScopePage
        );
    }

    #[test]
    fn test_textual_prefix_sharp_edge() {
        let scope = CrawlScope::from_seed("http://x.com/doc").unwrap();
        let sibling = canonicalize("http://x.com/docs/x").unwrap();
        assert_eq!(classify(&scope, &sibling), LinkClass::InScopePage);
    }
}
