//! Static site build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use adorn_static::{AsciiDocOptions, AsciiDocPlugin, BuildConfig, StaticBuilder};
use serde::Deserialize;

/// Configuration file structure (adorn.toml).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    site: SiteConfig,
    #[serde(default)]
    asciidoc: AsciiDocOptions,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SiteConfig {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_docs_dir")]
    docs_dir: String,
    #[serde(default = "default_site_dir")]
    site_dir: String,
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_use_directory_urls")]
    use_directory_urls: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            docs_dir: default_docs_dir(),
            site_dir: default_site_dir(),
            base_url: default_base_url(),
            use_directory_urls: default_use_directory_urls(),
        }
    }
}

fn default_name() -> String {
    "Documentation".to_string()
}
fn default_docs_dir() -> String {
    "docs".to_string()
}
fn default_site_dir() -> String {
    "site".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_use_directory_urls() -> bool {
    true
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::info!("No {} found, using defaults", path.display());
    Ok(ConfigFile::default())
}

/// Build settings for a project whose configuration lives at `config_path`.
/// Paths in the file are relative to its directory.
fn build_config(config_path: &Path, site: SiteConfig, output: Option<PathBuf>) -> BuildConfig {
    let project_dir = match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    BuildConfig {
        docs_dir: project_dir.join(&site.docs_dir),
        site_dir: output.unwrap_or_else(|| project_dir.join(&site.site_dir)),
        project_dir,
        base_url: site.base_url,
        title: site.name,
        use_directory_urls: site.use_directory_urls,
        extra_css: vec![],
        extra_javascript: vec![],
    }
}

/// Run the build command.
pub fn run(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
    tracing::info!("Building static site...");

    let file_config = load_config(config_path)?;
    let config = build_config(config_path, file_config.site, output);

    let mut builder =
        StaticBuilder::new(config)?.with_plugin(AsciiDocPlugin::new(file_config.asciidoc));
    let result = builder.build().context("Build failed")?;

    tracing::info!(
        "Built {} pages and copied {} files in {}ms",
        result.pages,
        result.media,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.site_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn parses_full_config() {
        let config: ConfigFile = toml::from_str(
            r#"
[site]
name = "Handbook"
docs_dir = "content"
use_directory_urls = false

[asciidoc]
asciidoctor_cmd = "/usr/local/bin/asciidoctor"
requires = ["asciidoctor-diagram"]
fail_on_error = false
"#,
        )
        .unwrap();

        assert_eq!(config.site.name, "Handbook");
        assert_eq!(config.site.docs_dir, "content");
        assert_eq!(config.site.site_dir, "site");
        assert!(!config.site.use_directory_urls);
        assert_eq!(config.asciidoc.asciidoctor_cmd, "/usr/local/bin/asciidoctor");
        assert_eq!(config.asciidoc.requires, vec!["asciidoctor-diagram"]);
        assert!(!config.asciidoc.fail_on_error);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(toml::from_str::<ConfigFile>("[site]\ntitle = \"x\"").is_err());
        assert!(toml::from_str::<ConfigFile>("[theme]\nname = \"x\"").is_err());
    }

    #[test]
    fn missing_config_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = load_config(&temp.path().join("adorn.toml")).unwrap();

        assert_eq!(config.site.docs_dir, "docs");
        assert!(config.asciidoc.fail_on_error);
    }

    #[test]
    fn paths_are_relative_to_config_file() {
        let config = build_config(
            Path::new("/work/project/adorn.toml"),
            SiteConfig::default(),
            None,
        );
        assert_eq!(config.project_dir, PathBuf::from("/work/project"));
        assert_eq!(config.docs_dir, PathBuf::from("/work/project/docs"));
        assert_eq!(config.site_dir, PathBuf::from("/work/project/site"));

        let config = build_config(
            Path::new("adorn.toml"),
            SiteConfig::default(),
            Some(PathBuf::from("out")),
        );
        assert_eq!(config.docs_dir, PathBuf::from("./docs"));
        assert_eq!(config.site_dir, PathBuf::from("out"));
    }
}
