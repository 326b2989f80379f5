//! Text rendering for documentation tools
//!
//! Every tool answers with plain markdown text, so lookup outcomes
//! (including failures) are turned into user-facing strings here.

use std::fmt::Write;

use crate::docs::discovery::SiteIndex;
use crate::scrape::ScrapeResult;

/// Number of component names per row in the site listing
const LISTING_COLUMNS: usize = 3;

pub const HELP_TEXT: &str = r#"# shadcn-svelte Help

## Available Actions

### Installation (`install`)
Get installation guides for different frameworks.

**Parameters:**
- `framework`: sveltekit, vite, astro, sapper, plain-svelte (optional)
- `packageManager`: npm, yarn, pnpm, bun (optional, for preference note)

**Example:**
```json
{
  "action": "install",
  "framework": "sveltekit",
  "packageManager": "pnpm"
}
```

### Migration (`migrate`)
Get migration guides for upgrading shadcn-svelte or Svelte versions.

**Example:**
```json
{
  "action": "migrate"
}
```

### Theming (`theme`)
Get theming and customization documentation.

**Example:**
```json
{
  "action": "theme"
}
```

### CLI (`cli`)
Get CLI tool documentation.

**Example:**
```json
{
  "action": "cli"
}
```

## Other Tools

- **List Tool** (`shadcn-svelte-list`): See all available components and documentation
- **Get Tool** (`shadcn-svelte-get`): Get detailed information about specific components or docs

## Quick Start

1. Use `list` to see what's available
2. Use `get` to retrieve specific component or documentation details
3. Use this `utility` tool for installation, migration, theming, and CLI help

## Tips

- All content is fetched from the live shadcn-svelte.com website
- Results are cached for 24 hours for better performance
- Always use Svelte 5 with runes (`$state`, `$props`, `$derived`, `$effect`)"#;

fn error_text(result: &ScrapeResult) -> &str {
    result.error.as_deref().unwrap_or("no content returned")
}

pub fn render_component(name: &str, result: &ScrapeResult) -> String {
    if !result.success {
        return format!(
            "Component \"{name}\" not found or error occurred: {}\n\nUse the list tool to see available components.",
            error_text(result)
        );
    }

    match result.markdown.as_deref().filter(|md| !md.is_empty()) {
        Some(markdown) => format!("# {name} Component\n\n{markdown}"),
        None => format!(
            "Component \"{name}\" not found. Use the list tool to see available components."
        ),
    }
}

pub fn render_doc(name: &str, result: &ScrapeResult) -> String {
    if result.has_content() {
        format!("# {name}\n\n{}", result.markdown.as_deref().unwrap_or_default())
    } else {
        format!(
            "Documentation \"{name}\" not found. Use the list tool to see available documentation sections."
        )
    }
}

pub fn render_installation(
    framework: Option<&str>,
    package_manager: &str,
    result: &ScrapeResult,
) -> String {
    let Some(markdown) = result.markdown.as_deref().filter(|_| result.has_content()) else {
        return format!("Error fetching installation docs: {}", error_text(result));
    };

    let mut response = String::from("# Installation Guide\n\n");
    if let Some(framework) = framework {
        let _ = write!(response, "**Framework:** {framework}\n\n");
    }
    response.push_str(markdown);
    let _ = write!(
        response,
        "\n\n---\n\n**Note:** The examples above can be adapted for {package_manager}. Replace the package manager commands as needed."
    );
    response
}

/// Render a single-page guide such as theming or CLI docs
///
/// `topic` names the guide in the error message (e.g. `theming`).
pub fn render_guide(title: &str, topic: &str, result: &ScrapeResult) -> String {
    match result.markdown.as_deref().filter(|_| result.has_content()) {
        Some(markdown) => format!("# {title}\n\n{markdown}"),
        None => format!("Error fetching {topic} docs: {}", error_text(result)),
    }
}

/// Render the site index
pub fn render_listing(index: &SiteIndex, components: bool, docs: bool) -> String {
    let mut result = String::from("# shadcn-svelte Resources\n\n");

    if components {
        result.push_str("## Components\n\n");
        let _ = write!(
            result,
            "Found {} components:\n\n",
            index.components.len()
        );
        for row in index.components.chunks(LISTING_COLUMNS) {
            let row: Vec<String> = row.iter().map(|name| format!("`{name}`")).collect();
            result.push_str(&row.join(" · "));
            result.push('\n');
        }
        result.push('\n');
    }

    if docs {
        result.push_str("## Documentation\n\n");
        let groups = [
            ("Installation", &index.docs.installation),
            ("Dark Mode", &index.docs.dark_mode),
            ("Migration", &index.docs.migration),
            ("General", &index.docs.general),
        ];
        for (heading, names) in groups {
            let _ = writeln!(result, "### {heading}");
            for name in names {
                let _ = writeln!(result, "- `{name}`");
            }
            result.push('\n');
        }
    }

    result.push_str(
        "---\n\n**Usage:** Use the `get` tool with `name` and `type` to retrieve detailed information.\n\n",
    );
    result.push_str("**Examples:**\n");
    result.push_str("- Get button component: `{ name: 'button', type: 'component' }`\n");
    result.push_str("- Get installation docs: `{ name: 'sveltekit', type: 'doc' }`\n");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::discovery::DocSections;

    const URL: &str = "https://www.shadcn-svelte.com/docs/components/button";

    fn found(markdown: &str) -> ScrapeResult {
        ScrapeResult::success(URL, Some(markdown.to_string()), None, None)
    }

    #[test]
    fn test_render_component() {
        assert_eq!(
            render_component("button", &found("Click me")),
            "# button Component\n\nClick me"
        );
        assert_eq!(
            render_component("button", &ScrapeResult::failure(URL, "timed out")),
            "Component \"button\" not found or error occurred: timed out\n\nUse the list tool to see available components."
        );
        assert_eq!(
            render_component("button", &ScrapeResult::success(URL, None, None, None)),
            "Component \"button\" not found. Use the list tool to see available components."
        );
    }

    #[test]
    fn test_render_doc() {
        assert_eq!(render_doc("cli", &found("Usage")), "# cli\n\nUsage");
        let missing = "Documentation \"cli\" not found. Use the list tool to see available documentation sections.";
        assert_eq!(render_doc("cli", &ScrapeResult::failure(URL, "boom")), missing);
        assert_eq!(
            render_doc("cli", &ScrapeResult::success(URL, None, None, None)),
            missing
        );
    }

    #[test]
    fn test_render_installation() {
        let text = render_installation(Some("vite"), "pnpm", &found("npx shadcn-svelte init"));
        assert!(text.starts_with("# Installation Guide\n\n**Framework:** vite\n\nnpx shadcn-svelte init"));
        assert!(text.ends_with("can be adapted for pnpm. Replace the package manager commands as needed."));

        let text = render_installation(None, "npm", &found("steps"));
        assert!(!text.contains("**Framework:**"));

        assert_eq!(
            render_installation(None, "npm", &ScrapeResult::failure(URL, "down")),
            "Error fetching installation docs: down"
        );
    }

    #[test]
    fn test_render_guide() {
        assert_eq!(
            render_guide("Theming Guide", "theming", &found("CSS variables")),
            "# Theming Guide\n\nCSS variables"
        );
        assert_eq!(
            render_guide("CLI Documentation", "CLI", &ScrapeResult::failure(URL, "down")),
            "Error fetching CLI docs: down"
        );
    }

    #[test]
    fn test_render_listing() {
        let index = SiteIndex {
            components: ["accordion", "alert", "badge", "button"]
                .map(String::from)
                .to_vec(),
            docs: DocSections {
                installation: vec!["sveltekit".into()],
                general: vec!["cli".into(), "theming".into()],
                ..DocSections::default()
            },
        };

        let text = render_listing(&index, true, true);
        assert!(text.contains("Found 4 components:\n\n`accordion` · `alert` · `badge`\n`button`\n"));
        assert!(text.contains("### Installation\n- `sveltekit`\n"));
        assert!(text.contains("### General\n- `cli`\n- `theming`\n"));
        assert!(text.contains("**Usage:**"));

        let text = render_listing(&index, false, true);
        assert!(!text.contains("## Components"));
        assert!(text.contains("## Documentation"));

        let text = render_listing(&index, true, false);
        assert!(!text.contains("## Documentation"));
    }
}
