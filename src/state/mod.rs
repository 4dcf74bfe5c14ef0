//! State module for tracking crawl progress
//!
//! This module provides the per-run dedup state and the outcome types for
//! pages and assets.
//!
//! # Components
//!
//! - `Registry`: atomic claim set keyed by canonical URL (one for pages, one for assets)
//! - `PageState`: how a page work item ended (saved, duplicate, render failed)
//! - `AssetState`: how an asset work item ended (downloaded, already on disk, ...)

mod page_state;
mod registry;

// Re-export main types
pub use page_state::{AssetState, PageState};
pub use registry::{Claim, Registry};
