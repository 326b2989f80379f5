//! Integration tests for the shadcn-svelte MCP tools
//!
//! A mockito server stands in for the Firecrawl API; requests it has no mock
//! for are answered with 501, which the client reports as a failed scrape.

use anyhow::Result;
use mockito::{Matcher, Mock, ServerGuard};
use rmcp::ServerHandler;
use rmcp::handler::server::tool::Parameters;
use serde_json::json;
use shadcn_svelte_mcp::docs::tools::{
    Framework, GetDocsParams, ListFilter, ListParams, PackageManager, UtilityAction,
    UtilityParams,
};
use shadcn_svelte_mcp::{Config, ShadcnSvelteService};
use tempfile::TempDir;

const SITE: &str = "https://www.shadcn-svelte.com";

/// Helper to create a test service with temporary cache
fn create_test_service(server: &ServerGuard) -> Result<(ShadcnSvelteService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let config = Config::new(server.url())
        .with_api_key("fc-test")
        .with_cache_dir(Some(temp_dir.path().to_path_buf()));
    let service = ShadcnSvelteService::new(&config)?;
    Ok((service, temp_dir))
}

/// Mock a scrape of `path` that returns `markdown`, expected `hits` times
async fn mock_page(server: &mut ServerGuard, path: &str, markdown: &str, hits: usize) -> Mock {
    server
        .mock("POST", "/v1/scrape")
        .match_body(Matcher::PartialJson(json!({ "url": format!("{SITE}{path}") })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "success": true, "data": { "markdown": markdown } }).to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Mock every scrape as a missing page, expected `hits` times
async fn mock_missing_pages(server: &mut ServerGuard, hits: usize) -> Mock {
    server
        .mock("POST", "/v1/scrape")
        .with_status(404)
        .with_body("Not Found")
        .expect(hits)
        .create_async()
        .await
}

fn get_params(name: &str, kind: &str) -> Parameters<GetDocsParams> {
    Parameters(GetDocsParams {
        name: name.to_string(),
        kind: kind.to_string(),
    })
}

#[tokio::test]
async fn test_get_component_is_cached() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_page(&mut server, "/docs/components/button", "Buttons everywhere", 1).await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let first = service.shadcn_svelte_get(get_params("button", "component")).await;
    let second = service.shadcn_svelte_get(get_params("button", "component")).await;

    assert_eq!(first, "# button Component\n\nButtons everywhere");
    assert_eq!(first, second);
    mock.assert_async().await;
    assert_eq!(service.page_cache().stats().await.disk_entries, 1);
    Ok(())
}

#[tokio::test]
async fn test_get_component_sends_component_options() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/scrape")
        .match_header("authorization", "Bearer fc-test")
        .match_body(Matcher::PartialJson(json!({
            "url": format!("{SITE}/docs/components/card"),
            "formats": ["markdown"],
            "onlyMainContent": true,
            "excludeTags": ["nav", "footer", "aside"]
        })))
        .with_status(200)
        .with_body(json!({ "markdown": "A card" }).to_string())
        .create_async()
        .await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service.shadcn_svelte_get(get_params("card", "component")).await;

    mock.assert_async().await;
    assert_eq!(text, "# card Component\n\nA card");
    Ok(())
}

#[tokio::test]
async fn test_get_component_failure_is_not_cached() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/scrape")
        .with_status(503)
        .with_body("maintenance")
        .expect(2)
        .create_async()
        .await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service.shadcn_svelte_get(get_params("dialog", "component")).await;
    assert_eq!(
        text,
        "Component \"dialog\" not found or error occurred: Firecrawl API error (503): maintenance\n\nUse the list tool to see available components."
    );

    // The failure was not cached, so the remote is asked again
    service.shadcn_svelte_get(get_params("dialog", "component")).await;
    mock.assert_async().await;
    assert_eq!(service.page_cache().stats().await.disk_entries, 0);
    Ok(())
}

#[tokio::test]
async fn test_get_doc_falls_back_to_later_candidates() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let install = mock_page(&mut server, "/docs/installation/vite", "Vite setup", 1).await;
    let dark_mode = mock_page(&mut server, "/docs/dark-mode/vite", "Vite dark mode", 0).await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service.shadcn_svelte_get(get_params("vite", "doc")).await;

    assert_eq!(text, "# vite\n\nVite setup");
    install.assert_async().await;
    dark_mode.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_get_unknown_doc() -> Result<()> {
    let server = mockito::Server::new_async().await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service
        .shadcn_svelte_get(get_params("unknown-topic", "doc"))
        .await;

    assert_eq!(
        text,
        "Documentation \"unknown-topic\" not found. Use the list tool to see available documentation sections."
    );
    assert_eq!(service.page_cache().stats().await.disk_entries, 0);
    Ok(())
}

#[tokio::test]
async fn test_get_rejects_invalid_requests() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let (service, _temp_dir) = create_test_service(&server)?;

    assert_eq!(
        service.shadcn_svelte_get(get_params("button", "widget")).await,
        "Invalid type \"widget\". Use \"component\" or \"doc\"."
    );

    let text = service.shadcn_svelte_get(get_params("../secrets", "doc")).await;
    assert!(text.starts_with("Error retrieving doc \"../secrets\":"));

    let text = service.shadcn_svelte_get(get_params("   ", "component")).await;
    assert!(text.contains("Name cannot be empty"));

    let text = service
        .shadcn_svelte_get(get_params("installation/sveltekit", "component"))
        .await;
    assert!(text.starts_with("Error retrieving component"));

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_get_trims_names() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_page(&mut server, "/docs/theming", "CSS variables", 1).await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service.shadcn_svelte_get(get_params("  theming ", "doc")).await;
    assert_eq!(text, "# theming\n\nCSS variables");
    Ok(())
}

#[tokio::test]
async fn test_cache_survives_restart() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_page(&mut server, "/docs/cli", "npx shadcn-svelte", 1).await;
    let temp_dir = TempDir::new()?;
    let config = Config::new(server.url()).with_cache_dir(Some(temp_dir.path().to_path_buf()));

    let first = ShadcnSvelteService::new(&config)?;
    let before = first.shadcn_svelte_get(get_params("cli", "doc")).await;
    drop(first);

    let second = ShadcnSvelteService::new(&config)?;
    let after = second.shadcn_svelte_get(get_params("cli", "doc")).await;

    assert_eq!(before, after);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_concurrent_lookups() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_page(&mut server, "/docs/components/tabs", "Tabs", 1).await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let (a, b) = tokio::join!(
        service.shadcn_svelte_get(get_params("tabs", "component")),
        service.shadcn_svelte_get(get_params("tabs", "component")),
    );

    assert_eq!(a, "# tabs Component\n\nTabs");
    assert_eq!(a, b);
    assert_eq!(service.page_cache().stats().await.disk_entries, 1);
    Ok(())
}

#[tokio::test]
async fn test_utility_help() -> Result<()> {
    let server = mockito::Server::new_async().await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service
        .shadcn_svelte_utility(Parameters(UtilityParams {
            action: UtilityAction::Help,
            framework: None,
            package_manager: None,
        }))
        .await;

    assert!(text.starts_with("# shadcn-svelte Help"));
    assert!(text.contains("shadcn-svelte-list"));
    Ok(())
}

#[tokio::test]
async fn test_utility_install_for_framework() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_page(&mut server, "/docs/installation/sveltekit", "pnpm dlx shadcn-svelte init", 1).await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service
        .shadcn_svelte_utility(Parameters(UtilityParams {
            action: UtilityAction::Install,
            framework: Some(Framework::Sveltekit),
            package_manager: Some(PackageManager::Pnpm),
        }))
        .await;

    assert!(text.starts_with(
        "# Installation Guide\n\n**Framework:** sveltekit\n\npnpm dlx shadcn-svelte init"
    ));
    assert!(text.contains("can be adapted for pnpm"));

    // The guide shares the page cache with the get tool
    let text = service
        .shadcn_svelte_get(get_params("installation/sveltekit", "doc"))
        .await;
    assert_eq!(text, "# installation/sveltekit\n\npnpm dlx shadcn-svelte init");
    Ok(())
}

#[tokio::test]
async fn test_utility_migrate_falls_back() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_page(&mut server, "/docs/migration/svelte-5", "Upgrade to runes", 1).await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service
        .shadcn_svelte_utility(Parameters(UtilityParams {
            action: UtilityAction::Migrate,
            framework: None,
            package_manager: None,
        }))
        .await;

    assert_eq!(text, "# Migration Guide\n\nUpgrade to runes");
    Ok(())
}

#[tokio::test]
async fn test_utility_theme_error() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_missing_pages(&mut server, 1).await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service
        .shadcn_svelte_utility(Parameters(UtilityParams {
            action: UtilityAction::Theme,
            framework: None,
            package_manager: None,
        }))
        .await;

    assert_eq!(text, "Error fetching theming docs: Firecrawl API error (404): Not Found");
    // Only /docs/theming is scraped
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_utility_cli_unconfigured_remote() -> Result<()> {
    let server = mockito::Server::new_async().await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service
        .shadcn_svelte_utility(Parameters(UtilityParams {
            action: UtilityAction::Cli,
            framework: None,
            package_manager: None,
        }))
        .await;

    assert!(text.starts_with("Error fetching CLI docs: Firecrawl API error (501)"));
    Ok(())
}

#[tokio::test]
async fn test_utility_migrate_error_tries_two_pages() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = mock_missing_pages(&mut server, 2).await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service
        .shadcn_svelte_utility(Parameters(UtilityParams {
            action: UtilityAction::Migrate,
            framework: None,
            package_manager: None,
        }))
        .await;

    assert_eq!(text, "Error fetching migration docs: Firecrawl API error (404): Not Found");
    // /docs/migration, then /docs/migration/svelte-5
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_list_resources() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/map")
        .match_body(Matcher::PartialJson(json!({ "url": SITE, "limit": 500 })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "links": [
                    format!("{SITE}/docs/components/button"),
                    format!("{SITE}/docs/components/accordion"),
                    { "url": format!("{SITE}/docs/installation/sveltekit") },
                    format!("{SITE}/docs/theming"),
                ]
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let all = service.shadcn_svelte_list(Parameters(ListParams::default())).await;
    assert!(all.contains("Found 2 components:\n\n`accordion` · `button`\n"));
    assert!(all.contains("### Installation\n- `sveltekit`\n"));
    assert!(all.contains("### General\n- `theming`\n"));

    // Served from the index cache
    let docs = service
        .shadcn_svelte_list(Parameters(ListParams {
            filter: Some(ListFilter::Docs),
        }))
        .await;
    assert!(!docs.contains("## Components"));
    assert!(docs.contains("## Documentation"));

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_list_failure() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/map")
        .with_status(500)
        .with_body("crawler offline")
        .create_async()
        .await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let text = service.shadcn_svelte_list(Parameters(ListParams::default())).await;
    assert_eq!(
        text,
        "Error listing resources: Firecrawl API error (500): crawler offline"
    );
    Ok(())
}

#[tokio::test]
async fn test_server_info() -> Result<()> {
    let server = mockito::Server::new_async().await;
    let (service, _temp_dir) = create_test_service(&server)?;

    let info = service.get_info();
    assert!(info.capabilities.tools.is_some());
    assert!(
        info.instructions
            .as_deref()
            .is_some_and(|text| text.contains("shadcn-svelte-get"))
    );
    Ok(())
}

#[test]
fn test_service_requires_api_url() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::new("").with_cache_dir(Some(temp_dir.path().to_path_buf()));
    assert!(ShadcnSvelteService::new(&config).is_err());
}
