use std::sync::Arc;

use crate::cache::{LookupKind, TieredCache, build_key};
use crate::docs::candidates::{CandidateResolver, candidate_paths, primary_path};
use crate::scrape::{PageFetcher, ScrapeResult};

/// Cache-first documentation lookup
///
/// A lookup is answered from the cache when a live entry exists; otherwise
/// the candidate paths are scraped and a result with content is written
/// back. Failed and empty results are never cached, so a transient outage
/// cannot hide a page for a full TTL.
#[derive(Debug)]
pub struct DocRetriever<F> {
    cache: Arc<TieredCache<ScrapeResult>>,
    resolver: CandidateResolver<F>,
}

impl<F: PageFetcher> DocRetriever<F> {
    pub fn new(cache: Arc<TieredCache<ScrapeResult>>, fetcher: F) -> Self {
        Self {
            cache,
            resolver: CandidateResolver::new(fetcher),
        }
    }

    pub fn cache(&self) -> &Arc<TieredCache<ScrapeResult>> {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        self.resolver.fetcher()
    }

    /// Retrieve the documentation for an already validated name
    pub async fn retrieve(&self, kind: LookupKind, name: &str) -> ScrapeResult {
        self.lookup(kind, name, candidate_paths(kind, name)).await
    }

    /// Like [`retrieve`](Self::retrieve), but a miss scrapes only the
    /// primary path for `name`
    ///
    /// Shares the cache key of a full lookup, so a page cached by either is
    /// served to both.
    pub async fn retrieve_primary(&self, kind: LookupKind, name: &str) -> ScrapeResult {
        self.lookup(kind, name, vec![primary_path(kind, name)]).await
    }

    async fn lookup(&self, kind: LookupKind, name: &str, paths: Vec<String>) -> ScrapeResult {
        let key = build_key(kind, name);

        if let Some(entry) = self.cache.get(key.as_str()).await {
            tracing::info!("Cache hit for {}: {}", kind, name);
            return entry.payload;
        }

        tracing::info!("Fetching {} from web: {}", kind, name);
        let result = self.resolver.resolve(kind, name, &paths).await;

        if result.has_content() {
            self.cache.set(key.as_str(), result.clone()).await;
        } else {
            tracing::warn!(
                "No content for {} {}: {}",
                kind,
                name,
                result.error.as_deref().unwrap_or("empty page")
            );
        }

        result
    }
}
