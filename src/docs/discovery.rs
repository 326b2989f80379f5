//! Discovery of available components and documentation sections
//!
//! The site is mapped once per TTL through the Firecrawl map endpoint and
//! the URLs are grouped into a [`SiteIndex`].

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::cache::TieredCache;
use crate::scrape::{FirecrawlClient, MapOptions};

/// Cache key of the site index
pub const SITE_INDEX_KEY: &str = "index:site";

/// Upper bound on URLs requested from the map endpoint
pub const MAP_LIMIT: u32 = 500;

/// Documentation sections grouped by the area of the site they live in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSections {
    pub installation: Vec<String>,
    pub dark_mode: Vec<String>,
    pub migration: Vec<String>,
    pub general: Vec<String>,
}

/// Everything the documentation site offers, sorted and de-duplicated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteIndex {
    pub components: Vec<String>,
    pub docs: DocSections,
}

impl SiteIndex {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
            && self.docs.installation.is_empty()
            && self.docs.dark_mode.is_empty()
            && self.docs.migration.is_empty()
            && self.docs.general.is_empty()
    }
}

/// Group site URLs into components and doc sections
///
/// Only paths below `/docs` are considered. Query strings, fragments and
/// trailing slashes are ignored; anything unparseable is skipped.
pub fn classify_urls<I, S>(urls: I) -> SiteIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut components = BTreeSet::new();
    let mut installation = BTreeSet::new();
    let mut dark_mode = BTreeSet::new();
    let mut migration = BTreeSet::new();
    let mut general = BTreeSet::new();

    for url in urls {
        let Ok(parsed) = reqwest::Url::parse(url.as_ref()) else {
            tracing::debug!("Skipping unparseable URL: {}", url.as_ref());
            continue;
        };

        let segments: Vec<&str> = parsed
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["docs", "components", name] => {
                components.insert(name.to_string());
            }
            ["docs", "installation", name] => {
                installation.insert(name.to_string());
            }
            ["docs", "dark-mode", name] => {
                dark_mode.insert(name.to_string());
            }
            ["docs", "migration", name] => {
                migration.insert(name.to_string());
            }
            ["docs", "components"] => {}
            ["docs", name] => {
                general.insert(name.to_string());
            }
            _ => {}
        }
    }

    SiteIndex {
        components: components.into_iter().collect(),
        docs: DocSections {
            installation: installation.into_iter().collect(),
            dark_mode: dark_mode.into_iter().collect(),
            migration: migration.into_iter().collect(),
            general: general.into_iter().collect(),
        },
    }
}

/// Cached view of what the documentation site contains
#[derive(Debug)]
pub struct SiteDirectory {
    client: FirecrawlClient,
    cache: Arc<TieredCache<SiteIndex>>,
}

impl SiteDirectory {
    pub fn new(client: FirecrawlClient, cache: Arc<TieredCache<SiteIndex>>) -> Self {
        Self { client, cache }
    }

    /// Return the site index, mapping the site on a cache miss
    pub async fn index(&self) -> Result<SiteIndex> {
        if let Some(entry) = self.cache.get(SITE_INDEX_KEY).await {
            tracing::info!("Cache hit for site index");
            return Ok(entry.payload);
        }

        tracing::info!("Mapping documentation site: {}", self.client.site_url());
        let options = MapOptions {
            limit: MAP_LIMIT,
            ..MapOptions::default()
        };
        let map = self.client.map_site(&options).await;
        if !map.success {
            bail!(
                "{}",
                map.error
                    .unwrap_or_else(|| "Failed to map documentation site".to_string())
            );
        }

        let index = classify_urls(&map.urls);
        if index.is_empty() {
            tracing::warn!("Site map returned no documentation URLs");
        } else {
            self.cache.set(SITE_INDEX_KEY, index.clone()).await;
        }

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_urls() {
        let index = classify_urls([
            "https://www.shadcn-svelte.com/docs",
            "https://www.shadcn-svelte.com/docs/components",
            "https://www.shadcn-svelte.com/docs/components/button",
            "https://www.shadcn-svelte.com/docs/components/accordion/",
            "https://www.shadcn-svelte.com/docs/components/button#usage",
            "https://www.shadcn-svelte.com/docs/installation",
            "https://www.shadcn-svelte.com/docs/installation/sveltekit",
            "https://www.shadcn-svelte.com/docs/dark-mode/svelte",
            "https://www.shadcn-svelte.com/docs/migration/svelte-5",
            "https://www.shadcn-svelte.com/docs/theming?ref=nav",
            "https://www.shadcn-svelte.com/blocks",
            "https://www.shadcn-svelte.com/docs/components/button/examples/extra",
            "not a url",
        ]);

        assert_eq!(index.components, vec!["accordion", "button"]);
        assert_eq!(index.docs.installation, vec!["sveltekit"]);
        assert_eq!(index.docs.dark_mode, vec!["svelte"]);
        assert_eq!(index.docs.migration, vec!["svelte-5"]);
        assert_eq!(index.docs.general, vec!["installation", "theming"]);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_classify_nothing() {
        let index = classify_urls(["https://www.shadcn-svelte.com/blocks"]);
        assert!(index.is_empty());
        assert_eq!(index, SiteIndex::default());
    }
}
