//! AsciiDoc pages.
//!
//! [`AsciiDocPlugin`] declares `.adoc` files as pages, renders them through
//! the render cache, and hands the builder the normalized body, the
//! metadata and the heading outline in place of the Markdown pipeline.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use adorn_html::normalize;
use adorn_render::{Asciidoctor, Backend, RenderCache, RenderConfig, RenderedDocument, SafeMode};

use crate::assets::{ASCIIDOC_CSS, STRIP_CALLOUTS_JS};
use crate::builder::BuildConfig;
use crate::files::{walk_files, Files, SiteFile};
use crate::hooks::{Page, Plugin, PluginError};

/// Site-relative location of the AsciiDoc stylesheet.
pub const CSS_HREF: &str = "assets/asciidoc.css";

/// Site-relative location of the callout copy script.
pub const JS_HREF: &str = "assets/strip_callouts_like_antora.js";

/// Directories holding include-only fragments rather than pages.
const EXCLUDED_PREFIXES: [&str; 3] = ["partials/", "snippets/", "modules/"];

/// The `[asciidoc]` section of the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AsciiDocOptions {
    /// Renderer executable
    pub asciidoctor_cmd: String,

    /// Renderer safe mode
    pub safe_mode: SafeMode,

    /// Include base directory relative to the project root, defaults to the docs directory
    pub base_dir: Option<PathBuf>,

    /// Document attributes passed to every render
    pub attributes: BTreeMap<String, String>,

    /// Ruby libraries loaded by the renderer
    pub requires: Vec<String>,

    /// Abort the build when a page fails to render
    pub fail_on_error: bool,

    /// Ask the renderer for backtraces
    pub trace: bool,
}

impl Default for AsciiDocOptions {
    fn default() -> Self {
        Self {
            asciidoctor_cmd: "asciidoctor".to_string(),
            safe_mode: SafeMode::Safe,
            base_dir: None,
            attributes: BTreeMap::new(),
            requires: Vec::new(),
            fail_on_error: true,
            trace: false,
        }
    }
}

impl AsciiDocOptions {
    /// Renderer settings, with the base directory resolved against `config`.
    pub fn render_config(&self, config: &BuildConfig) -> RenderConfig {
        let base_dir = match &self.base_dir {
            Some(dir) => config.project_dir.join(dir),
            None => config.docs_dir.clone(),
        };

        RenderConfig {
            command: self.asciidoctor_cmd.clone(),
            safe_mode: self.safe_mode,
            base_dir,
            attributes: self.attributes.clone(),
            requires: self.requires.clone(),
            fail_on_error: self.fail_on_error,
            trace: self.trace,
        }
    }
}

/// Renders `.adoc` pages and styles them for the site theme.
pub struct AsciiDocPlugin<B: Backend = Asciidoctor> {
    options: AsciiDocOptions,
    make_backend: fn(RenderConfig) -> B,
    cache: Option<RenderCache<B>>,
    pages: HashMap<String, PathBuf>,
}

impl AsciiDocPlugin {
    /// A plugin rendering through the `asciidoctor` command.
    pub fn new(options: AsciiDocOptions) -> Self {
        Self::with_backend(options, Asciidoctor::new)
    }
}

impl<B: Backend> AsciiDocPlugin<B> {
    /// A plugin rendering through the backend built by `make_backend`.
    ///
    /// The backend is created in `on_config`, once paths are known.
    pub fn with_backend(options: AsciiDocOptions, make_backend: fn(RenderConfig) -> B) -> Self {
        Self {
            options,
            make_backend,
            cache: None,
            pages: HashMap::new(),
        }
    }

    /// The render cache, once configured.
    pub fn cache(&self) -> Option<&RenderCache<B>> {
        self.cache.as_ref()
    }

    /// Source paths of the declared AsciiDoc pages, keyed by docs-relative path.
    pub fn pages(&self) -> &HashMap<String, PathBuf> {
        &self.pages
    }

    fn source_of(&self, page: &Page) -> Option<&Path> {
        self.pages.get(page.src_uri()).map(PathBuf::as_path)
    }

    fn render(&self, source: &Path) -> Result<Arc<RenderedDocument>, PluginError> {
        let cache = self
            .cache
            .as_ref()
            .ok_or(PluginError::NotConfigured(self.name()))?;
        Ok(cache.render_page(source)?)
    }
}

fn is_page_source(src_uri: &str) -> bool {
    src_uri.ends_with(".adoc") && !EXCLUDED_PREFIXES.iter().any(|p| src_uri.starts_with(p))
}

fn write_asset(site_dir: &Path, href: &str, content: &str) -> Result<(), PluginError> {
    let path = site_dir.join(href);
    let io_err = |source| PluginError::Io {
        path: path.clone(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&path, content).map_err(io_err)
}

impl<B: Backend> Plugin for AsciiDocPlugin<B> {
    fn name(&self) -> &'static str {
        "asciidoc"
    }

    fn on_config(&mut self, config: &mut BuildConfig) -> Result<(), PluginError> {
        let render_config = self.options.render_config(config);
        tracing::debug!(
            "AsciiDoc: {} (safe mode {}, base dir {})",
            render_config.command,
            render_config.safe_mode,
            render_config.base_dir.display()
        );

        let backend = (self.make_backend)(render_config);
        self.cache = Some(RenderCache::new(backend, self.options.fail_on_error));
        self.pages.clear();

        if !config.extra_css.iter().any(|href| href == CSS_HREF) {
            config.extra_css.push(CSS_HREF.to_string());
        }
        if !config.extra_javascript.iter().any(|href| href == JS_HREF) {
            config.extra_javascript.push(JS_HREF.to_string());
        }

        Ok(())
    }

    fn on_files(&mut self, files: &mut Files, config: &BuildConfig) -> Result<(), PluginError> {
        files.retain(|file| !file.src_uri.ends_with(".adoc"));

        for (src_uri, path) in walk_files(&config.docs_dir) {
            if !is_page_source(&src_uri) {
                continue;
            }

            files.append(SiteFile::page(
                &src_uri,
                &config.docs_dir,
                &config.site_dir,
                config.use_directory_urls,
            ));
            self.pages.insert(src_uri, path);
        }

        tracing::info!("Found {} AsciiDoc pages", self.pages.len());
        Ok(())
    }

    fn on_page_read_source(
        &self,
        page: &Page,
        _config: &BuildConfig,
    ) -> Result<Option<String>, PluginError> {
        Ok(self.source_of(page).map(|_| String::new()))
    }

    fn on_page_markdown(
        &self,
        markdown: String,
        page: &mut Page,
        _config: &BuildConfig,
    ) -> Result<String, PluginError> {
        let Some(source) = self.source_of(page) else {
            return Ok(markdown);
        };

        let document = self.render(source)?;
        page.meta = document.meta.clone();
        page.file.abs_src_path = source.to_path_buf();

        Ok(String::new())
    }

    fn on_page_content(
        &self,
        html: String,
        page: &mut Page,
        _config: &BuildConfig,
    ) -> Result<String, PluginError> {
        let Some(source) = self.source_of(page) else {
            return Ok(html);
        };

        let document = self.render(source)?;
        page.toc = document.toc.clone();

        Ok(normalize(&document.html))
    }

    fn on_post_build(&self, config: &BuildConfig) -> Result<(), PluginError> {
        write_asset(&config.site_dir, CSS_HREF, ASCIIDOC_CSS)?;
        write_asset(&config.site_dir, JS_HREF, STRIP_CALLOUTS_JS)
    }
}
