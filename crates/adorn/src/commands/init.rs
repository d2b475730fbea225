//! Initialize documentation in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command, scaffolding next to `config_path`.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing adorn...");

    let project_dir = config_path.parent().unwrap_or(Path::new(""));
    let docs_dir = project_dir.join("docs");

    // Check if docs already exists
    if docs_dir.exists() {
        if !yes {
            tracing::warn!("docs/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(&docs_dir).context("Failed to create docs directory")?;
    }

    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        tracing::info!("Created {}", config_path.display());
    }

    let pages = [
        ("index.adoc", DEFAULT_INDEX),
        ("getting-started.adoc", DEFAULT_GETTING_STARTED),
        ("partials/install.adoc", DEFAULT_INSTALL_PARTIAL),
    ];

    for (name, content) in pages {
        let path = docs_dir.join(name);
        if path.exists() && !yes {
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {name}"))?;
        tracing::info!("Created docs/{}", name);
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'adorn build' to build the site.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Adorn Configuration

[site]
# Site title
name = "My Documentation"

# Source directory for documentation
docs_dir = "docs"

# Output directory for built site
site_dir = "site"

# Base URL (for deployment)
base_url = "/"

# Give each page its own directory (guide/ instead of guide.html)
use_directory_urls = true

[asciidoc]
# Asciidoctor executable
asciidoctor_cmd = "asciidoctor"

# unsafe | safe | server | secure
safe_mode = "safe"

# Attributes passed to every page
attributes = { icons = "font", source-highlighter = "highlight.js" }

# Stop the build when a page fails to render
fail_on_error = true
"#;

const DEFAULT_INDEX: &str = r#"= Welcome
:description: Documentation home page

This is your documentation site, built by *adorn*.

== Next steps

Read xref:getting-started.adoc[Getting Started] to learn how pages are written.
"#;

const DEFAULT_GETTING_STARTED: &str = r#"= Getting Started

== Installation

include::partials/install.adoc[]

NOTE: Files under `partials/`, `snippets/` and `modules/` are only included, never built as pages.

== Building

[source,bash]
----
adorn build <1>
adorn build -o public <2>
----
<1> Builds into `site/`.
<2> Builds into another directory.
"#;

const DEFAULT_INSTALL_PARTIAL: &str = r#"Install Asciidoctor, then adorn:

[source,bash]
----
gem install asciidoctor
cargo install adorn
----
"#;
