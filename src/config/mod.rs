//! Configuration module for Site-Archiver
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Command-line flags and the `SEED_URL` environment
//! variable are layered on top of it by the binary.
//!
//! # Example
//!
//! ```no_run
//! use site_archiver::config::{load_layered, ConfigOverrides};
//! use std::path::Path;
//!
//! let (config, hash) =
//!     load_layered(Some(Path::new("archiver.toml")), &ConfigOverrides::default()).unwrap();
//! println!("Pages in flight: {} (config {:?})", config.crawler.max_concurrent_pages, hash);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ConfigOverrides, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config_with_hash, load_layered, parse_config};
pub use validation::{validate, MAX_CONCURRENT_PAGES};
