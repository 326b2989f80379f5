use std::sync::Arc;

use rmcp::schemars;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cache::LookupKind;
use crate::cache::types::validate_lookup_name;
use crate::docs::{
    DocRetriever,
    discovery::SiteDirectory,
    outputs::{
        HELP_TEXT, render_component, render_doc, render_guide, render_installation,
        render_listing,
    },
};
use crate::scrape::FirecrawlClient;

/// Doc section tried when the main migration page has no content
const MIGRATION_FALLBACK: &str = "migration/svelte-5";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetDocsParams {
    #[schemars(description = "Name of the component or documentation section")]
    pub name: String,
    #[serde(rename = "type")]
    #[schemars(description = "Type: 'component' for UI components, 'doc' for documentation")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum UtilityAction {
    Install,
    Migrate,
    Theme,
    Cli,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    Sveltekit,
    Vite,
    Astro,
    Sapper,
    PlainSvelte,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Sveltekit => "sveltekit",
            Framework::Vite => "vite",
            Framework::Astro => "astro",
            Framework::Sapper => "sapper",
            Framework::PlainSvelte => "plain-svelte",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UtilityParams {
    #[schemars(description = "Action to perform: install, migrate, theme, cli, or help")]
    pub action: UtilityAction,
    #[schemars(description = "Framework for installation")]
    pub framework: Option<Framework>,
    #[schemars(description = "Package manager preference (for display purposes, default: npm)")]
    pub package_manager: Option<PackageManager>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListFilter {
    Components,
    Docs,
    #[default]
    All,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListParams {
    #[serde(rename = "type")]
    #[schemars(description = "What to list: components, docs, or all (default: all)")]
    pub filter: Option<ListFilter>,
}

#[derive(Debug, Clone)]
pub struct DocsTools {
    retriever: Arc<DocRetriever<FirecrawlClient>>,
    directory: Arc<SiteDirectory>,
}

impl DocsTools {
    pub fn new(
        retriever: Arc<DocRetriever<FirecrawlClient>>,
        directory: Arc<SiteDirectory>,
    ) -> Self {
        Self {
            retriever,
            directory,
        }
    }

    pub async fn get(&self, params: GetDocsParams) -> String {
        let kind: LookupKind = match params.kind.parse() {
            Ok(kind) => kind,
            Err(e) => return e.to_string(),
        };

        let name = match validate_lookup_name(kind, &params.name) {
            Ok(name) => name,
            Err(e) => return format!("Error retrieving {kind} \"{}\": {e}", params.name),
        };

        let result = self.retriever.retrieve(kind, &name).await;
        match kind {
            LookupKind::Component => render_component(&name, &result),
            LookupKind::Doc => render_doc(&name, &result),
        }
    }

    pub async fn utility(&self, params: UtilityParams) -> String {
        match params.action {
            UtilityAction::Install => {
                let name = match params.framework {
                    Some(framework) => format!("installation/{}", framework.as_str()),
                    None => "installation".to_string(),
                };
                let result = self.retriever.retrieve_primary(LookupKind::Doc, &name).await;
                render_installation(
                    params.framework.map(|f| f.as_str()),
                    params.package_manager.unwrap_or_default().as_str(),
                    &result,
                )
            }
            UtilityAction::Migrate => {
                let result = self
                    .retriever
                    .retrieve_primary(LookupKind::Doc, "migration")
                    .await;
                if result.has_content() {
                    return render_guide("Migration Guide", "migration", &result);
                }

                let fallback = self
                    .retriever
                    .retrieve_primary(LookupKind::Doc, MIGRATION_FALLBACK)
                    .await;
                if fallback.has_content() {
                    render_guide("Migration Guide", "migration", &fallback)
                } else {
                    render_guide("Migration Guide", "migration", &result)
                }
            }
            UtilityAction::Theme => {
                let result = self
                    .retriever
                    .retrieve_primary(LookupKind::Doc, "theming")
                    .await;
                render_guide("Theming Guide", "theming", &result)
            }
            UtilityAction::Cli => {
                let result = self.retriever.retrieve_primary(LookupKind::Doc, "cli").await;
                render_guide("CLI Documentation", "CLI", &result)
            }
            UtilityAction::Help => HELP_TEXT.to_string(),
        }
    }

    pub async fn list(&self, params: ListParams) -> String {
        let filter = params.filter.unwrap_or_default();
        match self.directory.index().await {
            Ok(index) => render_listing(
                &index,
                matches!(filter, ListFilter::Components | ListFilter::All),
                matches!(filter, ListFilter::Docs | ListFilter::All),
            ),
            Err(e) => format!("Error listing resources: {e:#}"),
        }
    }
}
