//! Runtime configuration
//!
//! Built once at startup (from CLI flags and environment variables in
//! `main`) and handed to the constructors that need it.

use anyhow::{Context, Result, bail};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use zeroize::Zeroizing;

use crate::cache::constants::DEFAULT_TTL_SECS;

/// Public site the documentation is scraped from
pub const DEFAULT_SITE_URL: &str = "https://www.shadcn-svelte.com";

/// Default bound on a single remote fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cache time-to-live
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(DEFAULT_TTL_SECS);

#[derive(Clone)]
pub struct Config {
    /// Base URL of the Firecrawl API, without the `/v1/...` suffix
    pub firecrawl_api_url: String,
    /// Bearer credential for the Firecrawl API; empty means no Authorization header
    pub firecrawl_api_key: Zeroizing<String>,
    /// Base URL of the documentation site
    pub site_url: String,
    /// Cache root; `None` uses `~/.shadcn-svelte-mcp/cache`
    pub cache_dir: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
}

impl Config {
    pub fn new(firecrawl_api_url: impl Into<String>) -> Self {
        Self {
            firecrawl_api_url: trim_base_url(firecrawl_api_url.into()),
            firecrawl_api_key: Zeroizing::new(String::new()),
            site_url: DEFAULT_SITE_URL.to_string(),
            cache_dir: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.firecrawl_api_key = Zeroizing::new(api_key.into());
        self
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = trim_base_url(site_url.into());
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: Option<PathBuf>) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.firecrawl_api_key.is_empty()
    }

    /// Check that both base URLs are http(s) and the timeouts are usable
    pub fn validate(&self) -> Result<()> {
        if self.firecrawl_api_url.is_empty() {
            bail!("Firecrawl API URL is not configured (set FIRECRAWL_API_URL)");
        }
        check_http_url(&self.firecrawl_api_url)
            .with_context(|| format!("Invalid Firecrawl API URL: {}", self.firecrawl_api_url))?;
        check_http_url(&self.site_url)
            .with_context(|| format!("Invalid site URL: {}", self.site_url))?;

        if self.fetch_timeout.is_zero() {
            bail!("Fetch timeout must be greater than zero");
        }
        if self.cache_ttl.is_zero() {
            bail!("Cache TTL must be greater than zero");
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("firecrawl_api_url", &self.firecrawl_api_url)
            .field(
                "firecrawl_api_key",
                &if self.has_api_key() { "<redacted>" } else { "<unset>" },
            )
            .field("site_url", &self.site_url)
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl", &self.cache_ttl)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

/// Expand `~` and environment variables in a user-supplied cache path
pub fn expand_cache_dir(raw: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(raw).with_context(|| format!("Failed to expand path: {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn check_http_url(raw: &str) -> Result<()> {
    let url = reqwest::Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => bail!("unsupported scheme \"{other}\", expected http or https"),
    }
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
