//! Frontier of discovered-but-unprocessed work
//!
//! The frontier is a LIFO stack. Links found on a page are pushed in reverse
//! DOM order, so with one item in flight the crawl visits pages in exactly
//! the depth-first order a recursive traversal would, and the recursion depth
//! never touches the call stack.

use crate::url::CanonicalUrl;

/// A unit of work for the crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkItem {
    /// Page to render, save, and expand
    Page(CanonicalUrl),
    /// Asset to download
    Asset(CanonicalUrl),
}

impl WorkItem {
    /// The URL this item refers to, page or asset
    pub fn url(&self) -> &CanonicalUrl {
        match self {
            Self::Page(url) | Self::Asset(url) => url,
        }
    }
}

/// Stack of pending work items
#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<WorkItem>,
}

impl Frontier {
    /// Creates a frontier holding only the seed page
    pub fn seeded(seed: CanonicalUrl) -> Self {
        Self {
            stack: vec![WorkItem::Page(seed)],
        }
    }

    /// Adds the work discovered on one page, given in DOM order
    ///
    /// The first discovered item is the next one popped.
    pub fn push_discovered(&mut self, discovered: Vec<WorkItem>) {
        self.stack.extend(discovered.into_iter().rev());
    }

    /// Takes the next item to process
    pub fn pop(&mut self) -> Option<WorkItem> {
        self.stack.pop()
    }

    /// Returns the number of pending items
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
