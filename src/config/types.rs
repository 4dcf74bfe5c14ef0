use serde::Deserialize;

/// Main configuration structure for Site-Archiver
///
/// Every section is optional; missing keys take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Values supplied outside the config file, e.g. command-line flags
///
/// `None` leaves the file (or default) value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub seed_url: Option<String>,
    pub base_dir: Option<String>,
    pub max_concurrent_pages: Option<u32>,
    pub page_timeout_secs: Option<u64>,
}

impl Config {
    /// Replaces every value the overrides set
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(seed) = &overrides.seed_url {
            self.crawler.seed_url = Some(seed.clone());
        }
        if let Some(dir) = &overrides.base_dir {
            self.output.base_dir = dir.clone();
        }
        if let Some(max) = overrides.max_concurrent_pages {
            self.crawler.max_concurrent_pages = max;
        }
        if let Some(secs) = overrides.page_timeout_secs {
            self.crawler.page_timeout_secs = secs;
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// URL the crawl starts from; also defines the crawl scope
    #[serde(rename = "seed-url")]
    pub seed_url: Option<String>,

    /// Maximum number of pages and assets in flight at once
    #[serde(rename = "max-concurrent-pages")]
    pub max_concurrent_pages: u32,

    /// Per-page render timeout (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            max_concurrent_pages: 1,
            page_timeout_secs: 30,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the per-host output root is created in
    #[serde(rename = "base-dir")]
    pub base_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
        }
    }
}
