//! In-process fetchers used by unit tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::scrape::PageFetcher;
use crate::scrape::types::{ScrapeOptions, ScrapeResult};

pub(crate) const STUB_SITE: &str = "https://stub.test";

/// Serves canned results per path and records every request
#[derive(Debug, Default)]
pub(crate) struct StubFetcher {
    pages: HashMap<String, ScrapeResult>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serve `markdown` for `path`
    pub(crate) fn page(mut self, path: &str, markdown: &str) -> Self {
        let result = ScrapeResult::success(
            format!("{STUB_SITE}{path}"),
            Some(markdown.to_string()),
            None,
            None,
        );
        self.pages.insert(path.to_string(), result);
        self
    }

    /// Serve an arbitrary result for `path`
    pub(crate) fn result(mut self, path: &str, result: ScrapeResult) -> Self {
        self.pages.insert(path.to_string(), result);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageFetcher for StubFetcher {
    async fn fetch_path(&self, path: &str, _options: &ScrapeOptions) -> ScrapeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(path.to_string());

        self.pages.get(path).cloned().unwrap_or_else(|| {
            ScrapeResult::failure(
                format!("{STUB_SITE}{path}"),
                "Firecrawl API error (404): Not Found",
            )
        })
    }
}

/// Fails the test if the remote source is ever consulted
#[derive(Debug, Default)]
pub(crate) struct PanickingFetcher;

impl PageFetcher for PanickingFetcher {
    async fn fetch_path(&self, path: &str, _options: &ScrapeOptions) -> ScrapeResult {
        panic!("unexpected remote fetch for {path}");
    }
}
