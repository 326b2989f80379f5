//! Ordered path candidates for a lookup
//!
//! The site has no lookup API, so a name is tried against a fixed list of
//! URL templates per kind until one yields content.

use crate::cache::LookupKind;
use crate::scrape::{PageFetcher, ScrapeOptions, ScrapeResult};

/// Templates tried for a component lookup
pub const COMPONENT_TEMPLATES: &[&str] = &["/docs/components/{name}"];

/// Templates tried for a doc lookup, highest priority first
pub const DOC_TEMPLATES: &[&str] = &[
    "/docs/{name}",
    "/docs/installation/{name}",
    "/docs/dark-mode/{name}",
    "/docs/migration/{name}",
];

/// Page chrome stripped from component pages
const COMPONENT_EXCLUDED_TAGS: [&str; 3] = ["nav", "footer", "aside"];

pub fn templates(kind: LookupKind) -> &'static [&'static str] {
    match kind {
        LookupKind::Component => COMPONENT_TEMPLATES,
        LookupKind::Doc => DOC_TEMPLATES,
    }
}

/// Concrete paths for `name`, in the order they should be tried
pub fn candidate_paths(kind: LookupKind, name: &str) -> Vec<String> {
    templates(kind)
        .iter()
        .map(|template| template.replace("{name}", name))
        .collect()
}

/// Path built from the highest priority template only
pub fn primary_path(kind: LookupKind, name: &str) -> String {
    templates(kind)[0].replace("{name}", name)
}

/// Scrape options for pages of the given kind
pub fn scrape_options(kind: LookupKind) -> ScrapeOptions {
    match kind {
        LookupKind::Component => ScrapeOptions::default().exclude_tags(COMPONENT_EXCLUDED_TAGS),
        LookupKind::Doc => ScrapeOptions::default(),
    }
}

/// Tries candidate paths in order and keeps the first one with content
#[derive(Debug)]
pub struct CandidateResolver<F> {
    fetcher: F,
}

impl<F: PageFetcher> CandidateResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve a lookup by trying `paths` in order
    ///
    /// Returns the first result with content. When every path comes up
    /// empty the last attempted result is returned as-is.
    pub async fn resolve(&self, kind: LookupKind, name: &str, paths: &[String]) -> ScrapeResult {
        let options = scrape_options(kind);
        let mut last = None;

        for path in paths {
            let result = self.fetcher.fetch_path(path, &options).await;
            if result.has_content() {
                tracing::debug!("Resolved {} {} at {}", kind, name, path);
                return result;
            }
            tracing::debug!("No content for {} {} at {}", kind, name, path);
            last = Some(result);
        }

        last.unwrap_or_else(|| {
            ScrapeResult::failure(name, format!("No candidate paths for {kind} \"{name}\""))
        })
    }
}
