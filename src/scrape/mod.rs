//! # Scrape Module
//!
//! Access to the Firecrawl scraping API, which turns documentation pages
//! into markdown. Every outcome, including transport failures, comes back
//! as a [`ScrapeResult`] value rather than an error.
//!
//! - [`client`] - HTTP client and response normalization
//! - [`types`] - Request options and result shapes

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod stub;

pub use client::FirecrawlClient;
pub use types::{MapOptions, MapResult, ScrapeFormat, ScrapeOptions, ScrapeResult};

use std::future::Future;

/// Fetches one documentation path from the remote source
pub trait PageFetcher: Send + Sync {
    /// Fetch `path` (relative to the documentation site) and normalize the outcome
    fn fetch_path(
        &self,
        path: &str,
        options: &ScrapeOptions,
    ) -> impl Future<Output = ScrapeResult> + Send;
}
