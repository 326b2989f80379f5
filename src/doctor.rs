use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::constants::{CACHE_DIR, CACHE_ROOT_DIR};
use crate::config::Config;
use crate::scrape::{FirecrawlClient, PageFetcher, ScrapeOptions};

/// Bound on the connectivity probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Page scraped to prove the whole pipeline works
const PROBE_PATH: &str = "/docs";

pub struct DiagnosticResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub critical: bool,
}

impl DiagnosticResult {
    pub fn new(name: &str, success: bool, message: String, critical: bool) -> Self {
        Self {
            name: name.to_string(),
            success,
            message,
            critical,
        }
    }
}

pub async fn run_diagnostics(config: &Config) -> Vec<DiagnosticResult> {
    let mut results = Vec::new();

    results.push(check_cache_directory(config.cache_dir.clone()));

    let configuration = check_firecrawl_config(config);
    let configured = configuration.success;
    results.push(configuration);

    // Probing an unusable endpoint only repeats the configuration error
    if configured {
        results.push(check_firecrawl_connectivity(config).await);
    }

    results
}

fn check_cache_directory(cache_dir: Option<PathBuf>) -> DiagnosticResult {
    let cache_path = match cache_dir {
        Some(dir) => dir,
        None => match dirs::home_dir() {
            Some(home) => home.join(CACHE_ROOT_DIR).join(CACHE_DIR),
            None => {
                return DiagnosticResult::new(
                    "Cache directory",
                    false,
                    "Unable to determine home directory".to_string(),
                    false,
                );
            }
        },
    };

    if let Err(e) = fs::create_dir_all(&cache_path) {
        return DiagnosticResult::new(
            "Cache directory",
            false,
            format!("Cannot create cache directory: {e}"),
            false,
        );
    }

    let test_file = cache_path.join(".test_write");
    match fs::write(&test_file, "test") {
        Ok(()) => {
            let _ = fs::remove_file(&test_file);
            DiagnosticResult::new(
                "Cache directory",
                true,
                format!("{} (writable)", cache_path.display()),
                false,
            )
        }
        Err(e) => DiagnosticResult::new(
            "Cache directory",
            false,
            format!("Directory not writable: {e}"),
            false,
        ),
    }
}

fn check_firecrawl_config(config: &Config) -> DiagnosticResult {
    match config.validate() {
        Ok(()) => {
            let auth = if config.has_api_key() {
                "API key set"
            } else {
                "no API key"
            };
            DiagnosticResult::new(
                "Firecrawl configuration",
                true,
                format!("{} ({auth})", config.firecrawl_api_url),
                true,
            )
        }
        Err(e) => DiagnosticResult::new(
            "Firecrawl configuration",
            false,
            format!("{e:#}"),
            true,
        ),
    }
}

async fn check_firecrawl_connectivity(config: &Config) -> DiagnosticResult {
    let client = match FirecrawlClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            return DiagnosticResult::new(
                "Firecrawl connectivity",
                false,
                format!("{e:#}"),
                false,
            );
        }
    };

    let options = ScrapeOptions::default().timeout(PROBE_TIMEOUT);
    let result = client.fetch_path(PROBE_PATH, &options).await;

    if result.has_content() {
        DiagnosticResult::new(
            "Firecrawl connectivity",
            true,
            format!("scraped {}", result.url),
            false,
        )
    } else {
        let reason = result
            .error
            .unwrap_or_else(|| "scrape succeeded but returned no markdown".to_string());
        DiagnosticResult::new(
            "Firecrawl connectivity",
            false,
            format!("{}: {reason}", result.url),
            false,
        )
    }
}

pub fn print_results(results: &[DiagnosticResult]) {
    println!("🔍 shadcn-svelte-mcp doctor\n");

    let mut failed_count = 0;

    for result in results {
        let icon = if result.success { "✅" } else { "❌" };
        println!("{icon} {}: {}", result.name, result.message);
        if !result.success {
            failed_count += 1;
        }
    }

    if failed_count > 0 {
        println!(
            "\n[ERROR] Doctor found {} issue{}.",
            failed_count,
            if failed_count == 1 { "" } else { "s" }
        );

        for result in results.iter().filter(|result| !result.success) {
            match result.name.as_str() {
                "Cache directory" => {
                    println!("\nCache directory issues detected. Check file permissions and disk space.");
                }
                "Firecrawl configuration" => {
                    println!("\nSet FIRECRAWL_API_URL (and FIRECRAWL_API_KEY if your instance requires one):");
                    println!("  export FIRECRAWL_API_URL=http://localhost:3002");
                }
                "Firecrawl connectivity" => {
                    println!("\nFirecrawl could not scrape the documentation site. Check that the instance is running and can reach the internet.");
                }
                _ => {}
            }
        }

        println!("\nPlease fix the above errors before using shadcn-svelte-mcp.");
    } else {
        println!("\n✅ All checks passed! shadcn-svelte-mcp is ready to use.");
    }
}

pub fn exit_code(results: &[DiagnosticResult]) -> i32 {
    let failures = results.iter().filter(|result| !result.success);
    let mut has_failures = false;

    for result in failures {
        if result.critical {
            // Server cannot work at all
            return 2;
        }
        has_failures = true;
    }

    if has_failures { 1 } else { 0 }
}
