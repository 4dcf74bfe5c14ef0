//! Output module for everything the crawler writes
//!
//! This module handles:
//! - Mapping page and asset URLs to paths under the output root
//! - Writing files so that interrupted runs never leave truncated output
//! - Recording run statistics and printing the end-of-run summary

mod paths;
pub mod stats;
mod writer;

pub use paths::{asset_path, map_to_path, sanitize, ASSET_DIR, INDEX_FILE, MAX_FILE_NAME_LEN};
pub use stats::{print_report, CrawlReport};
pub use writer::{ensure_dir, write_atomic, PartialFile};

use crate::url::CrawlScope;
use std::path::{Path, PathBuf};

/// Resolves the output root for a scope under a base directory
///
/// The root is named after the seed host, see [`CrawlScope::output_dir_name`].
///
/// # Example
///
/// ```
/// use site_archiver::output::output_root;
/// use site_archiver::url::CrawlScope;
/// use std::path::Path;
///
/// let scope = CrawlScope::from_seed("http://x.com/docs/").unwrap();
/// assert_eq!(output_root(Path::new("mirror"), &scope), Path::new("mirror/x.com"));
/// ```
pub fn output_root(base_dir: &Path, scope: &CrawlScope) -> PathBuf {
    base_dir.join(scope.output_dir_name())
}
