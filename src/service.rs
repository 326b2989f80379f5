use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::cache::TieredCache;
use crate::cache::constants::{INDEX_DIR, PAGES_DIR};
use crate::config::Config;
use crate::docs::{
    DocRetriever, SiteDirectory,
    tools::{DocsTools, GetDocsParams, ListParams, UtilityParams},
};
use crate::scrape::{FirecrawlClient, ScrapeResult};

#[derive(Debug, Clone)]
pub struct ShadcnSvelteService {
    docs_tools: DocsTools,
    pages: Arc<TieredCache<ScrapeResult>>,
    tool_router: ToolRouter<Self>,
}

impl ShadcnSvelteService {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let client = FirecrawlClient::new(config)?;
        let pages = Arc::new(
            TieredCache::open(config.cache_dir.clone(), PAGES_DIR, config.cache_ttl)
                .context("Failed to open page cache")?,
        );
        let index = Arc::new(
            TieredCache::open(config.cache_dir.clone(), INDEX_DIR, config.cache_ttl)
                .context("Failed to open site index cache")?,
        );

        let retriever = Arc::new(DocRetriever::new(pages.clone(), client.clone()));
        let directory = Arc::new(SiteDirectory::new(client, index));

        Ok(Self {
            docs_tools: DocsTools::new(retriever, directory),
            pages,
            tool_router: Self::tool_router(),
        })
    }

    /// Page cache shared by every lookup
    pub fn page_cache(&self) -> &Arc<TieredCache<ScrapeResult>> {
        &self.pages
    }
}

#[tool_router]
impl ShadcnSvelteService {
    #[tool(
        name = "shadcn-svelte-get",
        description = "Get detailed information about any shadcn-svelte component or documentation section from the live website. Use type 'component' for UI components (e.g. 'button', 'data-table') and 'doc' for documentation sections (e.g. 'theming', 'cli', 'sveltekit')."
    )]
    pub async fn shadcn_svelte_get(&self, params: Parameters<GetDocsParams>) -> String {
        self.docs_tools.get(params.0).await
    }

    #[tool(
        name = "shadcn-svelte-utility",
        description = "Utility tool for installation guides, migration help, theming, and other shadcn-svelte tasks from the live website. Use action 'help' for a description of every action."
    )]
    pub async fn shadcn_svelte_utility(&self, params: Parameters<UtilityParams>) -> String {
        self.docs_tools.utility(params.0).await
    }

    #[tool(
        name = "shadcn-svelte-list",
        description = "List all available shadcn-svelte components and documentation sections by discovering them from the live website. Use before the get tool to find valid names."
    )]
    pub async fn shadcn_svelte_list(&self, params: Parameters<ListParams>) -> String {
        self.docs_tools.list(params.0).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for ShadcnSvelteService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "MCP server for shadcn-svelte documentation scraped from the live website. Use shadcn-svelte-list to discover component and documentation names, then shadcn-svelte-get with a name and type ('component' or 'doc') to read a page. Use shadcn-svelte-utility for installation, migration, theming and CLI guides. Pages are cached locally for 24 hours by default.".to_string(),
            ),
            ..Default::default()
        }
    }
}
