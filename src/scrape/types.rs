//! Request options and normalized results for the scraping API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Output formats the scraping API can return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrapeFormat {
    Markdown,
    Html,
    RawHtml,
    Links,
}

/// Options for scraping one page
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeOptions {
    pub formats: Vec<ScrapeFormat>,
    pub only_main_content: bool,
    pub include_tags: Option<Vec<String>>,
    pub exclude_tags: Option<Vec<String>>,
    /// Delay before scraping, in milliseconds
    pub wait_for: Option<u64>,
    /// Overrides the client's default timeout
    pub timeout: Option<Duration>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            formats: vec![ScrapeFormat::Markdown],
            only_main_content: true,
            include_tags: None,
            exclude_tags: None,
            wait_for: None,
            timeout: None,
        }
    }
}

impl ScrapeOptions {
    pub fn exclude_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Normalized outcome of one scrape
///
/// A failed result always carries `error` and never carries content. A
/// successful result without `markdown` means the page was reachable but
/// had nothing extractable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    pub fn success(
        url: impl Into<String>,
        markdown: Option<String>,
        html: Option<String>,
        metadata: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            url: url.into(),
            markdown,
            html,
            metadata,
            success: true,
            error: None,
        }
    }

    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markdown: None,
            html: None,
            metadata: None,
            success: false,
            error: Some(error.into()),
        }
    }

    /// Successful and carrying non-empty markdown
    pub fn has_content(&self) -> bool {
        self.success && self.markdown.as_deref().is_some_and(|md| !md.is_empty())
    }
}

/// Options for discovering the URLs of a site
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub search: Option<String>,
    pub limit: u32,
    pub include_subdomains: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            search: None,
            limit: 100,
            include_subdomains: false,
        }
    }
}

/// Outcome of a site map request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapResult {
    pub urls: Vec<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MapResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            urls: Vec::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}
