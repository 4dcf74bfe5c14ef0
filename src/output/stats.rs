//! Run statistics
//!
//! This module tallies what happened to every work item in a crawl run and
//! renders the summary printed at the end of a run.

use crate::state::{AssetState, PageState};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Crawl run summary
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Seed URL the run started from
    pub seed: String,

    /// Output root the run wrote into
    pub output_root: PathBuf,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages rendered and written to disk
    pub pages_saved: u64,

    /// Pages whose render failed or timed out
    pub pages_failed: u64,

    /// Page work items dropped because the page was already claimed
    pub pages_duplicate: u64,

    /// Assets fetched and written to disk
    pub assets_downloaded: u64,

    /// Assets skipped because the file already existed
    pub assets_on_disk: u64,

    /// Assets whose fetch failed
    pub assets_failed: u64,

    /// Asset work items dropped because the asset was already claimed
    pub assets_duplicate: u64,

    /// Links discarded as out of scope
    pub links_out_of_scope: u64,

    /// Links that could not be resolved to an http(s) URL
    pub links_unresolvable: u64,
}

impl CrawlReport {
    /// Starts an empty report stamped with the current time
    pub fn start(seed: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            seed: seed.into(),
            output_root: output_root.into(),
            started_at: Utc::now(),
            finished_at: None,
            pages_saved: 0,
            pages_failed: 0,
            pages_duplicate: 0,
            assets_downloaded: 0,
            assets_on_disk: 0,
            assets_failed: 0,
            assets_duplicate: 0,
            links_out_of_scope: 0,
            links_unresolvable: 0,
        }
    }

    pub fn record_page(&mut self, state: PageState) {
        match state {
            PageState::Saved => self.pages_saved += 1,
            PageState::RenderFailed => self.pages_failed += 1,
            PageState::Duplicate => self.pages_duplicate += 1,
        }
    }

    pub fn record_asset(&mut self, state: AssetState) {
        match state {
            AssetState::Downloaded => self.assets_downloaded += 1,
            AssetState::AlreadyOnDisk => self.assets_on_disk += 1,
            AssetState::FetchFailed => self.assets_failed += 1,
            AssetState::Duplicate => self.assets_duplicate += 1,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Pages that were actually handed to the renderer
    pub fn pages_visited(&self) -> u64 {
        self.pages_saved + self.pages_failed
    }

    /// Run duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Summary ===\n");

    println!("Run:");
    println!("  Seed: {}", report.seed);
    println!("  Output: {}", report.output_root.display());
    println!("  Started: {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = report.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Pages:");
    println!("  Saved: {}", report.pages_saved);
    println!("  Render failures: {}", report.pages_failed);
    println!("  Duplicates skipped: {}", report.pages_duplicate);
    println!();

    println!("Assets:");
    println!("  Downloaded: {}", report.assets_downloaded);
    println!("  Already on disk: {}", report.assets_on_disk);
    println!("  Fetch failures: {}", report.assets_failed);
    println!("  Duplicates skipped: {}", report.assets_duplicate);
    println!();

    println!("Links:");
    println!("  Out of scope: {}", report.links_out_of_scope);
    println!("  Unresolvable: {}", report.links_unresolvable);
    println!();

    let visited = report.pages_visited();
    let success_rate = if visited > 0 {
        (report.pages_saved as f64 / visited as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages saved)",
        success_rate, report.pages_saved, visited
    );
}
