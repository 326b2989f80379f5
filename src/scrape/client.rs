//! Firecrawl API client
//!
//! Wraps the `/v1/scrape` and `/v1/map` endpoints. The response envelope has
//! moved between API versions, so payload fields are looked up under `data`
//! first and at the top level second.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use zeroize::Zeroizing;

use crate::config::Config;
use crate::scrape::PageFetcher;
use crate::scrape::types::{MapOptions, MapResult, ScrapeFormat, ScrapeOptions, ScrapeResult};

/// Body of a `/v1/scrape` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: &'a [ScrapeFormat],
    only_main_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_tags: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wait_for: Option<u64>,
    /// Milliseconds
    timeout: u64,
}

/// Body of a `/v1/map` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MapRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    limit: u32,
    include_subdomains: bool,
}

/// Client for a (typically self-hosted) Firecrawl instance
#[derive(Clone)]
pub struct FirecrawlClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Zeroizing<String>,
    site_url: String,
    default_timeout: Duration,
}

impl fmt::Debug for FirecrawlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirecrawlClient")
            .field("api_url", &self.api_url)
            .field("site_url", &self.site_url)
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

impl FirecrawlClient {
    /// Create a new client from the runtime configuration
    pub fn new(config: &Config) -> Result<Self> {
        let user_agent = Self::format_user_agent();

        tracing::info!("Creating HTTP client with User-Agent: {}", user_agent);

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: config.firecrawl_api_url.clone(),
            api_key: config.firecrawl_api_key.clone(),
            site_url: config.site_url.clone(),
            default_timeout: config.fetch_timeout,
        })
    }

    /// Format the user-agent string
    fn format_user_agent() -> String {
        format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Absolute URL of a documentation path
    pub fn page_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.site_url, path)
        } else {
            format!("{}/{}", self.site_url, path)
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/v1/{}", self.api_url, name)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            request
        } else {
            request.bearer_auth(self.api_key.as_str())
        }
    }

    /// Scrape one absolute URL
    pub async fn scrape_url(&self, url: &str, options: &ScrapeOptions) -> ScrapeResult {
        tracing::debug!("Scraping {}", url);
        match self.try_scrape(url, options).await {
            Ok(result) => {
                if let Some(error) = &result.error {
                    tracing::error!("Error scraping {}: {}", url, error);
                }
                result
            }
            Err(e) => {
                tracing::error!("Error scraping {}: {:#}", url, e);
                ScrapeResult::failure(url, format!("{e:#}"))
            }
        }
    }

    async fn try_scrape(&self, url: &str, options: &ScrapeOptions) -> Result<ScrapeResult> {
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let body = ScrapeRequest {
            url,
            formats: &options.formats,
            only_main_content: options.only_main_content,
            include_tags: options.include_tags.as_deref(),
            exclude_tags: options.exclude_tags.as_deref(),
            wait_for: options.wait_for,
            timeout: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        };

        let response = self
            .authorized(self.client.post(self.endpoint("scrape")))
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| describe_transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("Firecrawl API error ({}): {}", status.as_u16(), error_text);
        }

        let body: Value = response
            .json()
            .await
            .context("Malformed Firecrawl response")?;

        Ok(normalize_scrape_response(url, &body))
    }

    /// Discover the URLs of the documentation site
    pub async fn map_site(&self, options: &MapOptions) -> MapResult {
        match self.try_map(options).await {
            Ok(urls) => MapResult {
                urls,
                success: true,
                error: None,
            },
            Err(e) => {
                tracing::error!("Error mapping {}: {:#}", self.site_url, e);
                MapResult::failure(format!("{e:#}"))
            }
        }
    }

    async fn try_map(&self, options: &MapOptions) -> Result<Vec<String>> {
        let body = MapRequest {
            url: &self.site_url,
            search: options.search.as_deref(),
            limit: options.limit,
            include_subdomains: options.include_subdomains,
        };

        let response = self
            .authorized(self.client.post(self.endpoint("map")))
            .timeout(self.default_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| describe_transport_error(e, self.default_timeout))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("Firecrawl API error ({}): {}", status.as_u16(), error_text);
        }

        let body: Value = response
            .json()
            .await
            .context("Malformed Firecrawl response")?;

        Ok(extract_links(&body))
    }
}

impl PageFetcher for FirecrawlClient {
    async fn fetch_path(&self, path: &str, options: &ScrapeOptions) -> ScrapeResult {
        let url = self.page_url(path);
        self.scrape_url(&url, options).await
    }
}

fn describe_transport_error(error: reqwest::Error, timeout: Duration) -> anyhow::Error {
    if error.is_timeout() {
        anyhow::anyhow!("Firecrawl request timed out after {}s", timeout.as_secs_f32())
    } else {
        anyhow::Error::new(error).context("Failed to reach Firecrawl")
    }
}

/// First non-empty string found under `data.<field>`, then `<field>`
fn pick_string(body: &Value, field: &str) -> Option<String> {
    [body.get("data").and_then(|data| data.get(field)), body.get(field)]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First object found under `data.<field>`, then `<field>`
fn pick_object(body: &Value, field: &str) -> Option<Map<String, Value>> {
    [body.get("data").and_then(|data| data.get(field)), body.get(field)]
        .into_iter()
        .flatten()
        .find_map(Value::as_object)
        .cloned()
}

/// Turn a scrape response body into a [`ScrapeResult`]
pub(crate) fn normalize_scrape_response(url: &str, body: &Value) -> ScrapeResult {
    if !body.is_object() {
        return ScrapeResult::failure(url, "Malformed Firecrawl response: expected a JSON object");
    }

    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let error = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("Firecrawl reported an unsuccessful scrape");
        return ScrapeResult::failure(url, error);
    }

    ScrapeResult::success(
        url,
        pick_string(body, "markdown"),
        pick_string(body, "html"),
        pick_object(body, "metadata"),
    )
}

/// URLs from a map response; links may be bare strings or `{ "url": ... }` objects
pub(crate) fn extract_links(body: &Value) -> Vec<String> {
    body.get("links")
        .and_then(Value::as_array)
        .map(|links| {
            links
                .iter()
                .filter_map(|link| {
                    link.as_str()
                        .or_else(|| link.get("url").and_then(Value::as_str))
                        .map(str::to_string)
                })
                .collect()
        })
        .unwrap_or_default()
}
