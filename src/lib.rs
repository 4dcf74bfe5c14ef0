//! Site-Archiver: a domain-scoped recursive site archiver
//!
//! This crate mirrors every page reachable beneath a seed URL to disk and
//! harvests the PDF assets those pages link to, visiting each page and
//! downloading each asset at most once per run.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Run-level error type for Site-Archiver operations
///
/// Only the variants here ever end a crawl. Per-page and per-asset failures
/// are reported through [`RenderError`] and [`FetchError`] and contained by
/// the archiver and downloader.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Crawl task failed: {0}")]
    TaskFailed(String),
}

impl ArchiveError {
    /// Wraps an IO error with the path it occurred at
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Not a URL: {0}")]
    NotAUrl(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Failure of the page renderer for a single page
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Render of {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },
}

/// Failure of the blob fetcher for a single asset
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request for {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Stream for {url} broke: {message}")]
    Stream { url: String, message: String },
}

/// Result type alias for Site-Archiver operations
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use output::CrawlReport;
pub use state::{Claim, Registry};
pub use url::{classify, resolve, CanonicalUrl, CrawlScope, LinkClass};
