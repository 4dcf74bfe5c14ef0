/// Outcome definitions for pages and assets handled during a crawl
///
/// Every work item the crawler picks up ends in exactly one of these states.
use std::fmt;

/// Final state of a page work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Page was rendered and its HTML written to disk
    Saved,

    /// Another branch already claimed this page
    Duplicate,

    /// Renderer failed or timed out; the page stays visited but unsaved
    RenderFailed,
}

/// Final state of an asset work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetState {
    /// Asset was fetched and written to disk
    Downloaded,

    /// A file already existed at the destination; no fetch was made
    AlreadyOnDisk,

    /// Another branch already claimed this asset
    Duplicate,

    /// Fetch failed; the asset stays claimed and is not retried this run
    FetchFailed,
}

impl PageState {
    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Duplicate => "duplicate",
            Self::RenderFailed => "render_failed",
        }
    }
}

impl AssetState {
    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::AlreadyOnDisk => "already_on_disk",
            Self::Duplicate => "duplicate",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
