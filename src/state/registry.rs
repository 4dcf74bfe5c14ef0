use crate::url::CanonicalUrl;
use std::collections::HashSet;
use std::sync::Mutex;

/// Result of a claim attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The caller now owns this URL and must process it exactly once
    Claimed,
    /// Another branch owns this URL; the caller must skip it
    AlreadyClaimed,
}

impl Claim {
    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed)
    }
}

/// Dedup registry keyed by canonical URL
///
/// One registry tracks visited pages and a separate one tracks downloaded
/// assets. `claim` is a single check-and-set under a mutex, so it is atomic
/// across every task sharing the registry through an `Arc`.
#[derive(Debug, Default)]
pub struct Registry {
    claimed: Mutex<HashSet<CanonicalUrl>>,
}

impl Registry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claims a URL
    ///
    /// # Examples
    ///
    /// ```
    /// use site_archiver::state::{Claim, Registry};
    /// use site_archiver::url::canonicalize;
    ///
    /// let registry = Registry::new();
    /// let url = canonicalize("http://x.com/docs/").unwrap();
    /// assert_eq!(registry.claim(&url), Claim::Claimed);
    /// assert_eq!(registry.claim(&url), Claim::AlreadyClaimed);
    /// ```
    pub fn claim(&self, url: &CanonicalUrl) -> Claim {
        // A poisoned lock still holds a consistent set: insert is one call.
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if claimed.insert(url.clone()) {
            Claim::Claimed
        } else {
            Claim::AlreadyClaimed
        }
    }

    /// Returns true if the URL has been claimed
    pub fn contains(&self, url: &CanonicalUrl) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(url)
    }

    /// Number of URLs claimed so far
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Returns whether nothing has been claimed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
