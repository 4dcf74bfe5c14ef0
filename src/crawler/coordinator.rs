//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Preparing the output root and asset directory
//! - Owning the per-run page and asset registries
//! - Driving the frontier with a bounded set of in-flight work
//! - Containing failures and releasing the renderer at the end of a run

use crate::config::Config;
use crate::crawler::archiver::{PageArchiver, PageVisit};
use crate::crawler::downloader::{AssetDownloader, AssetOutcome};
use crate::crawler::fetcher::{build_http_client, BlobFetcher, HttpBlobFetcher};
use crate::crawler::renderer::{HttpRenderer, PageRenderer};
use crate::crawler::scheduler::{Frontier, WorkItem};
use crate::output::{ensure_dir, output_root, CrawlReport, ASSET_DIR};
use crate::state::{PageState, Registry};
use crate::url::CrawlScope;
use crate::ArchiveError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Whole-request timeout for the shared HTTP client
///
/// Pages are bounded separately by the per-page render timeout, so in
/// practice this only limits asset downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Runtime settings for a crawl
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Directory every page and asset is written under
    pub output_root: PathBuf,

    /// Maximum pages and assets in flight at once (1 = sequential depth-first)
    pub max_concurrent_pages: usize,

    /// Upper bound for rendering a single page
    pub page_timeout: Duration,
}

impl ArchiveOptions {
    /// Derives options from a validated configuration
    pub fn from_config(config: &Config, scope: &CrawlScope) -> Self {
        Self {
            output_root: output_root(Path::new(&config.output.base_dir), scope),
            max_concurrent_pages: config.crawler.max_concurrent_pages.max(1) as usize,
            page_timeout: Duration::from_secs(config.crawler.page_timeout_secs),
        }
    }
}

/// Result of one finished work item
enum Completed {
    Page(PageVisit),
    Asset(AssetOutcome),
}

/// Main crawler coordinator structure
pub struct Coordinator {
    scope: CrawlScope,
    options: ArchiveOptions,
    renderer: Arc<dyn PageRenderer>,
    archiver: Arc<PageArchiver>,
    downloader: Arc<AssetDownloader>,
    visited_pages: Arc<Registry>,
    downloaded_assets: Arc<Registry>,
}

impl Coordinator {
    /// Creates a new coordinator with fresh registries
    ///
    /// # Arguments
    ///
    /// * `scope` - The crawl scope derived from the seed
    /// * `options` - Output root, concurrency and timeout settings
    /// * `renderer` - Page renderer used for every page
    /// * `fetcher` - Blob fetcher used for every asset
    pub fn new(
        scope: CrawlScope,
        options: ArchiveOptions,
        renderer: Arc<dyn PageRenderer>,
        fetcher: Arc<dyn BlobFetcher>,
    ) -> Self {
        let visited_pages = Arc::new(Registry::new());
        let downloaded_assets = Arc::new(Registry::new());

        let archiver = Arc::new(PageArchiver::new(
            scope.clone(),
            options.output_root.clone(),
            Arc::clone(&renderer),
            Arc::clone(&visited_pages),
            options.page_timeout,
        ));
        let downloader = Arc::new(AssetDownloader::new(
            options.output_root.clone(),
            fetcher,
            Arc::clone(&downloaded_assets),
        ));

        Self {
            scope,
            options,
            renderer,
            archiver,
            downloader,
            visited_pages,
            downloaded_assets,
        }
    }

    /// Pages claimed so far in this run
    pub fn visited_pages(&self) -> &Registry {
        &self.visited_pages
    }

    /// Assets claimed so far in this run
    pub fn downloaded_assets(&self) -> &Registry {
        &self.downloaded_assets
    }

    /// The directory this run writes into
    pub fn output_root(&self) -> &Path {
        &self.options.output_root
    }

    /// Runs the crawl to completion
    ///
    /// The renderer is shut down whether or not the traversal succeeds. On
    /// failure, files already written stay on disk.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Every reachable in-scope page was handled
    /// * `Err(ArchiveError)` - A filesystem failure or a crashed task ended the run
    pub async fn run(&self) -> Result<CrawlReport, ArchiveError> {
        tracing::info!(
            "Starting crawl of {} into {}",
            self.scope.seed(),
            self.options.output_root.display()
        );

        let result = self.traverse().await;
        self.renderer.shutdown().await;

        match result {
            Ok(report) => {
                tracing::info!(
                    "Crawl completed: {} pages saved, {} failed, {} assets downloaded in {}s",
                    report.pages_saved,
                    report.pages_failed,
                    report.assets_downloaded,
                    report.duration_seconds().unwrap_or(0)
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Crawl aborted: {}", e);
                Err(e)
            }
        }
    }

    /// Main crawl loop
    ///
    /// 1. Create the output root and the asset directory
    /// 2. Seed the frontier with the seed page
    /// 3. Keep up to `max_concurrent_pages` items in flight
    /// 4. Feed each finished page's discoveries back into the frontier
    /// 5. Stop when the frontier is empty and nothing is in flight
    async fn traverse(&self) -> Result<CrawlReport, ArchiveError> {
        let root = &self.options.output_root;
        ensure_dir(root).await?;
        ensure_dir(&root.join(ASSET_DIR)).await?;

        let mut report = CrawlReport::start(self.scope.seed().as_str(), root.clone());
        let mut frontier = Frontier::seeded(self.scope.seed().clone());
        // Dropping the set on an early return aborts whatever is still running
        let mut in_flight: JoinSet<Result<Completed, ArchiveError>> = JoinSet::new();

        loop {
            while in_flight.len() < self.options.max_concurrent_pages {
                let Some(item) = frontier.pop() else {
                    break;
                };
                tracing::trace!("Dispatching {}", item.url());
                in_flight.spawn(process(
                    item,
                    Arc::clone(&self.archiver),
                    Arc::clone(&self.downloader),
                ));
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            let completed = joined.map_err(|e| ArchiveError::TaskFailed(e.to_string()))??;

            match completed {
                Completed::Page(visit) => {
                    tracing::debug!("Page {}: {}", visit.url, visit.state);
                    report.record_page(visit.state);
                    report.links_out_of_scope += visit.out_of_scope;
                    report.links_unresolvable += visit.unresolvable;
                    frontier.push_discovered(visit.discovered);

                    if visit.state == PageState::Saved && report.pages_saved % 10 == 0 {
                        tracing::info!(
                            "Progress: {} pages saved, {} in frontier, {} in flight",
                            report.pages_saved,
                            frontier.len(),
                            in_flight.len()
                        );
                    }
                }
                Completed::Asset(outcome) => {
                    tracing::debug!("Asset {}: {}", outcome.url, outcome.state);
                    report.record_asset(outcome.state);
                }
            }
        }

        report.finish();
        Ok(report)
    }
}

/// Processes one work item on a spawned task
async fn process(
    item: WorkItem,
    archiver: Arc<PageArchiver>,
    downloader: Arc<AssetDownloader>,
) -> Result<Completed, ArchiveError> {
    match item {
        WorkItem::Page(url) => archiver.archive(&url).await.map(Completed::Page),
        WorkItem::Asset(url) => downloader.download(&url).await.map(Completed::Asset),
    }
}

/// Runs a complete crawl from configuration
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the seed URL (`InvalidSeed` if missing or malformed)
/// 2. Validate the rest of the configuration
/// 3. Build the shared HTTP client, renderer and fetcher
/// 4. Run the coordinator to completion
///
/// # Example
///
/// ```no_run
/// use site_archiver::config::Config;
/// use site_archiver::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::default();
/// config.crawler.seed_url = Some("https://example.com/docs/".to_string());
/// let report = run_crawl(config).await?;
/// println!("{} pages saved", report.pages_saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, ArchiveError> {
    let scope = scope_from_config(&config)?;
    crate::config::validate(&config)?;

    let client = build_http_client(&config.user_agent, REQUEST_TIMEOUT)?;
    let renderer: Arc<dyn PageRenderer> = Arc::new(HttpRenderer::new(client.clone()));
    let fetcher: Arc<dyn BlobFetcher> = Arc::new(HttpBlobFetcher::new(client));

    let options = ArchiveOptions::from_config(&config, &scope);
    Coordinator::new(scope, options, renderer, fetcher).run().await
}

/// Builds the crawl scope from the configured seed URL
pub fn scope_from_config(config: &Config) -> Result<CrawlScope, ArchiveError> {
    let seed = config
        .crawler
        .seed_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ArchiveError::InvalidSeed("no seed URL configured".to_string()))?;

    CrawlScope::from_seed(seed).map_err(|e| ArchiveError::InvalidSeed(e.to_string()))
}
