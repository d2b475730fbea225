//! Static site builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use adorn_html::{build_toc, extract_meta, Fragment, HeadingNode};

use crate::assets::AssetPipeline;
use crate::files::{walk_files, Files, SiteFile};
use crate::hooks::{Page, Plugin, PluginError};
use crate::templates::{Context, NavItem, TemplateEngine};

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root, where the configuration file lives
    pub project_dir: PathBuf,

    /// Source docs directory
    pub docs_dir: PathBuf,

    /// Output directory
    pub site_dir: PathBuf,

    /// Base URL for the site
    pub base_url: String,

    /// Site title
    pub title: String,

    /// Give each page its own directory (`guide/` instead of `guide.html`)
    pub use_directory_urls: bool,

    /// Stylesheets to include on every page, relative to the site root
    pub extra_css: Vec<String>,

    /// Scripts to include on every page, relative to the site root
    pub extra_javascript: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            docs_dir: PathBuf::from("docs"),
            site_dir: PathBuf::from("site"),
            base_url: "/".to_string(),
            title: "Documentation".to_string(),
            use_directory_urls: true,
            extra_css: vec![],
            extra_javascript: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of files copied verbatim
    pub media: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub site_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read docs directory: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

/// A page after the content stage, ready for templating.
#[derive(Debug)]
struct RenderedPage {
    file: SiteFile,
    title: String,
    description: Option<String>,
    toc: Vec<HeadingNode>,
    content: String,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    plugins: Vec<Box<dyn Plugin>>,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let templates =
            TemplateEngine::new().map_err(|e| BuildError::TemplateError(e.to_string()))?;

        Ok(Self {
            config,
            plugins: Vec::new(),
            templates,
        })
    }

    /// Register a plugin. Plugins run in registration order.
    pub fn with_plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// The configuration, as adjusted by plugins once a build has started.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the static site.
    pub fn build(&mut self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        for plugin in &mut self.plugins {
            plugin.on_config(&mut self.config)?;
        }

        if !self.config.docs_dir.is_dir() {
            return Err(BuildError::ReadError(format!(
                "Docs directory not found: {}",
                self.config.docs_dir.display()
            )));
        }

        fs::create_dir_all(&self.config.site_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let mut files = self.discover_files();
        for plugin in &mut self.plugins {
            plugin.on_files(&mut files, &self.config)?;
        }

        let builder = &*self;

        let media = builder.copy_media(&files)?;

        // Render page bodies in parallel
        let sources: Vec<&SiteFile> = files.documentation_pages().collect();
        let mut pages = sources
            .par_iter()
            .map(|file| builder.render_page(file))
            .collect::<Result<Vec<_>, _>>()?;
        pages.sort_by(|a, b| nav_order(&a.file).cmp(&nav_order(&b.file)));

        let nav = builder.build_navigation(&pages);

        pages
            .par_iter()
            .map(|page| builder.write_page(page, &nav))
            .collect::<Result<Vec<_>, _>>()?;

        builder.generate_assets()?;
        builder.generate_sitemap(&pages)?;

        for plugin in &builder.plugins {
            plugin.on_post_build(&builder.config)?;
        }

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            media,
            duration_ms: duration.as_millis() as u64,
            site_dir: builder.config.site_dir.clone(),
        })
    }

    /// Every file under the docs directory: Markdown files are pages,
    /// everything else is copied.
    fn discover_files(&self) -> Files {
        let config = &self.config;
        let mut files = Files::new();

        for (src_uri, _) in walk_files(&config.docs_dir) {
            let file = if src_uri.ends_with(".md") {
                SiteFile::page(
                    &src_uri,
                    &config.docs_dir,
                    &config.site_dir,
                    config.use_directory_urls,
                )
            } else {
                SiteFile::media(&src_uri, &config.docs_dir, &config.site_dir)
            };
            files.append(file);
        }

        files
    }

    /// Copy media files into the site directory.
    fn copy_media(&self, files: &Files) -> Result<usize, BuildError> {
        let mut copied = 0;

        for file in files.media_files() {
            if let Some(parent) = file.abs_dest_path.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
            }
            fs::copy(&file.abs_src_path, &file.abs_dest_path).map_err(|e| {
                BuildError::WriteError(format!("{}: {}", file.abs_dest_path.display(), e))
            })?;
            copied += 1;
        }

        Ok(copied)
    }

    /// Run one page through the read, Markdown and content stages.
    fn render_page(&self, file: &SiteFile) -> Result<RenderedPage, BuildError> {
        let mut page = Page::new(file.clone());

        let mut source = None;
        for plugin in &self.plugins {
            source = plugin.on_page_read_source(&page, &self.config)?;
            if source.is_some() {
                break;
            }
        }
        let source = match source {
            Some(source) => source,
            None => fs::read_to_string(&file.abs_src_path).map_err(|e| {
                BuildError::ReadError(format!("{}: {}", file.abs_src_path.display(), e))
            })?,
        };

        let mut markdown = source;
        for plugin in &self.plugins {
            markdown = plugin.on_page_markdown(markdown, &mut page, &self.config)?;
        }

        let mut fragment = Fragment::parse(&render_markdown(&markdown));
        page.toc = build_toc(&mut fragment);
        let heading = extract_meta(&fragment).remove("title");

        let mut content = fragment.to_html();
        for plugin in &self.plugins {
            content = plugin.on_page_content(content, &mut page, &self.config)?;
        }

        let title = page
            .meta
            .get("title")
            .cloned()
            .or(heading)
            .unwrap_or_else(|| capitalize(file.stem()));

        tracing::debug!("Rendered {} ({})", file.src_uri, title);

        Ok(RenderedPage {
            description: page.meta.get("description").cloned(),
            file: page.file,
            title,
            toc: page.toc,
            content,
        })
    }

    /// Build navigation structure from pages.
    fn build_navigation(&self, pages: &[RenderedPage]) -> Vec<NavItem> {
        let mut nav = Vec::new();
        let mut dirs: BTreeMap<&str, Vec<NavItem>> = BTreeMap::new();

        for page in pages {
            let item = NavItem {
                title: page.title.clone(),
                path: self.page_url(&page.file),
                children: Vec::new(),
                active: false,
            };

            // Group by parent directory
            dirs.entry(page.file.parent_uri()).or_default().push(item);
        }

        if let Some(root_items) = dirs.remove("") {
            nav.extend(root_items);
        }

        // Add subdirectories as nested items
        for (dir, items) in dirs {
            let dir_name = dir.rsplit('/').next().unwrap_or(dir);

            nav.push(NavItem {
                title: capitalize(dir_name),
                path: format!("{}{}/", self.config.base_url, dir),
                children: items,
                active: false,
            });
        }

        nav
    }

    /// Site-absolute URL of a page.
    fn page_url(&self, file: &SiteFile) -> String {
        format!("{}{}", self.config.base_url, file.url)
    }

    /// Render a page through the template and write it out.
    fn write_page(&self, page: &RenderedPage, nav: &[NavItem]) -> Result<(), BuildError> {
        let url = self.page_url(&page.file);
        let nav = nav.iter().map(|item| mark_active(item, &url)).collect();

        let context = Context {
            title: page.title.clone(),
            description: page.description.clone(),
            site_title: self.config.title.clone(),
            content: page.content.clone(),
            nav,
            toc: page.toc.clone(),
            base_url: self.config.base_url.clone(),
            extra_css: self.config.extra_css.clone(),
            extra_javascript: self.config.extra_javascript.clone(),
        };

        let html = self
            .templates
            .render_page("doc.html", &context)
            .map_err(|e: minijinja::Error| BuildError::TemplateError(e.to_string()))?;

        write_file(&page.file.abs_dest_path, &html)
    }

    /// Generate theme assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.site_dir.join("assets");

        write_file(&assets_dir.join("main.css"), &AssetPipeline::generate_css())?;
        write_file(&assets_dir.join("main.js"), &AssetPipeline::generate_js())
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, pages: &[RenderedPage]) -> Result<(), BuildError> {
        let urls: Vec<String> = pages
            .iter()
            .map(|page| {
                format!(
                    "  <url>\n    <loc>{}</loc>\n  </url>",
                    self.page_url(&page.file)
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        write_file(&self.config.site_dir.join("sitemap.xml"), &sitemap)
    }
}

/// Render Markdown to HTML.
fn render_markdown(markdown: &str) -> String {
    use pulldown_cmark::{html, Options, Parser};

    if markdown.is_empty() {
        return String::new();
    }

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Sort key placing each directory's index page first.
fn nav_order(file: &SiteFile) -> (&str, bool, &str) {
    (file.parent_uri(), file.stem() != "index", &file.src_uri)
}

fn mark_active(item: &NavItem, url: &str) -> NavItem {
    NavItem {
        title: item.title.clone(),
        path: item.path.clone(),
        children: item.children.iter().map(|c| mark_active(c, url)).collect(),
        active: item.children.is_empty() && item.path == url,
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, content)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
