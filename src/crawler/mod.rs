//! Crawler module for page archiving and asset harvesting
//!
//! This module contains the core crawling logic, including:
//! - The page renderer and blob fetcher capabilities
//! - HTML anchor extraction
//! - The frontier of pending work
//! - Page archiving and asset downloading
//! - Overall crawl coordination

mod archiver;
mod coordinator;
mod downloader;
mod fetcher;
mod parser;
mod renderer;
mod scheduler;

pub use archiver::{PageArchiver, PageVisit, SavedPage};
pub use coordinator::{run_crawl, scope_from_config, ArchiveOptions, Coordinator};
pub use downloader::{AssetDownloader, AssetOutcome, SavedAsset};
pub use fetcher::{build_http_client, BlobFetcher, ByteStream, HttpBlobFetcher};
pub use parser::{parse_html, ParsedPage};
pub use renderer::{HttpRenderer, PageRenderer, RenderedPage};
pub use scheduler::{Frontier, WorkItem};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::ArchiveError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the seed and build the crawl scope
/// 2. Create the output root and `pdfs/` directory
/// 3. Render, save and expand every reachable in-scope page
/// 4. Download every same-host PDF those pages link to
///
/// # Arguments
///
/// * `config` - The crawler configuration, with a seed URL set
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (per-page failures are only counted)
/// * `Err(ArchiveError)` - Invalid seed, bad configuration, or fatal failure
pub async fn crawl(config: Config) -> Result<CrawlReport, ArchiveError> {
    run_crawl(config).await
}
