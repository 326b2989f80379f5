use anyhow::Result;
use clap::{Parser, Subcommand};
use rmcp::{ServiceExt, handler::server::tool::Parameters, transport::stdio};
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use shadcn_svelte_mcp::cache::TieredCache;
use shadcn_svelte_mcp::cache::constants::{INDEX_DIR, PAGES_DIR};
use shadcn_svelte_mcp::cache::utils::format_bytes;
use shadcn_svelte_mcp::config::{DEFAULT_SITE_URL, expand_cache_dir};
use shadcn_svelte_mcp::docs::SiteIndex;
use shadcn_svelte_mcp::docs::tools::GetDocsParams;
use shadcn_svelte_mcp::scrape::ScrapeResult;
use shadcn_svelte_mcp::{Config, ShadcnSvelteService, doctor};

/// MCP server for shadcn-svelte documentation with offline caching
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the Firecrawl API (e.g. http://localhost:3002)
    #[arg(long, env = "FIRECRAWL_API_URL")]
    firecrawl_api_url: Option<String>,

    /// Firecrawl API key, sent as a bearer token when set
    #[arg(long, env = "FIRECRAWL_API_KEY", hide_env_values = true)]
    firecrawl_api_key: Option<String>,

    /// Documentation site to scrape
    #[arg(long, env = "SHADCN_BASE_URL", default_value = DEFAULT_SITE_URL)]
    site_url: String,

    /// Custom cache directory path (defaults to ~/.shadcn-svelte-mcp/cache)
    #[arg(long, env = "SHADCN_SVELTE_MCP_CACHE_DIR")]
    cache_dir: Option<String>,

    /// How long cached pages stay fresh, in seconds
    #[arg(long, env = "SHADCN_SVELTE_MCP_CACHE_TTL_SECS", default_value_t = 86_400)]
    cache_ttl_secs: u64,

    /// Timeout for a single scrape, in milliseconds
    #[arg(long, env = "SHADCN_SVELTE_MCP_FETCH_TIMEOUT_MS", default_value_t = 30_000)]
    fetch_timeout_ms: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the cache directory and the Firecrawl instance
    Doctor,
    /// Look up one page and print it
    Get {
        /// Lookup type: component or doc
        kind: String,
        /// Component or documentation section name
        name: String,
    },
    /// Inspect or reset the local cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// Show entry counts and disk usage
    Stats,
    /// Remove every cached page and the site index
    Clear,
}

impl Args {
    fn config(&self) -> Result<Config> {
        let cache_dir = self
            .cache_dir
            .as_deref()
            .map(expand_cache_dir)
            .transpose()?;

        Ok(
            Config::new(self.firecrawl_api_url.clone().unwrap_or_default())
                .with_api_key(self.firecrawl_api_key.clone().unwrap_or_default())
                .with_site_url(self.site_url.clone())
                .with_cache_dir(cache_dir)
                .with_cache_ttl(Duration::from_secs(self.cache_ttl_secs))
                .with_fetch_timeout(Duration::from_millis(self.fetch_timeout_ms)),
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing to stderr to avoid conflicts with stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = args.config()?;

    match args.command {
        Some(command) => handle_command(command, config).await,
        None => serve(config).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    tracing::info!("Starting shadcn-svelte MCP server on stdio...");
    tracing::debug!("Configuration: {:?}", config);
    if let Some(ref cache_dir) = config.cache_dir {
        tracing::info!("Using custom cache directory: {}", cache_dir.display());
    }

    let shadcn_service = ShadcnSvelteService::new(&config)?;

    // Serve using stdio transport
    let service = shadcn_service.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    // Wait for the service to complete
    service.waiting().await?;
    Ok(())
}

async fn handle_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Doctor => {
            let results = doctor::run_diagnostics(&config).await;
            doctor::print_results(&results);
            process::exit(doctor::exit_code(&results));
        }
        Commands::Get { kind, name } => {
            let service = ShadcnSvelteService::new(&config)?;
            let text = service
                .shadcn_svelte_get(Parameters(GetDocsParams { name, kind }))
                .await;
            println!("{text}");
            Ok(())
        }
        Commands::Cache { action } => {
            let pages: TieredCache<ScrapeResult> =
                TieredCache::open(config.cache_dir.clone(), PAGES_DIR, config.cache_ttl)?;
            let index: TieredCache<SiteIndex> =
                TieredCache::open(config.cache_dir.clone(), INDEX_DIR, config.cache_ttl)?;

            match action {
                CacheCommand::Stats => {
                    let page_stats = pages.stats().await;
                    let index_stats = index.stats().await;
                    let usage = pages.disk_usage().await? + index.disk_usage().await?;

                    println!(
                        "Pages: {} entries ({})",
                        page_stats.disk_entries,
                        pages.storage().cache_dir().display()
                    );
                    println!(
                        "Site index: {} entries ({})",
                        index_stats.disk_entries,
                        index.storage().cache_dir().display()
                    );
                    println!("Disk usage: {}", format_bytes(usage));
                    println!("TTL: {}s", config.cache_ttl.as_secs());
                }
                CacheCommand::Clear => {
                    pages.clear().await?;
                    index.clear().await?;
                    println!("Cache cleared");
                }
            }
            Ok(())
        }
    }
}
