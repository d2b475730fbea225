//! Build pipeline hooks.
//!
//! A [`Plugin`] is called at fixed points of a build. Every method has a
//! pass-through default, so a plugin only implements the stages it cares
//! about. Page hooks take `&self` because pages are processed in parallel.

use std::io;
use std::path::PathBuf;

use adorn_html::{HeadingNode, Meta};
use adorn_render::RenderError;

use crate::builder::BuildConfig;
use crate::files::{Files, SiteFile};

/// Errors raised by plugins.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Plugin '{0}' was used before on_config")]
    NotConfigured(&'static str),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A page as it moves through the pipeline.
#[derive(Debug, Clone)]
pub struct Page {
    /// The source file and its output location
    pub file: SiteFile,

    /// Page metadata, `title` and `description` are used by the theme
    pub meta: Meta,

    /// Heading outline shown next to the content
    pub toc: Vec<HeadingNode>,
}

impl Page {
    /// A page with no metadata and no outline yet.
    pub fn new(file: SiteFile) -> Self {
        Self {
            file,
            meta: Meta::new(),
            toc: Vec::new(),
        }
    }

    /// Source path relative to the docs directory.
    pub fn src_uri(&self) -> &str {
        &self.file.src_uri
    }
}

/// Hooks into the static site build.
pub trait Plugin: Send + Sync {
    /// Plugin identifier for logs and errors.
    fn name(&self) -> &'static str;

    /// Called once before anything is read. May adjust the configuration.
    fn on_config(&mut self, _config: &mut BuildConfig) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called with the discovered files. May add, remove or reclassify them.
    fn on_files(&mut self, _files: &mut Files, _config: &BuildConfig) -> Result<(), PluginError> {
        Ok(())
    }

    /// Supply the page source instead of reading the file.
    ///
    /// `None` leaves it to the next plugin, or to the builder.
    fn on_page_read_source(
        &self,
        _page: &Page,
        _config: &BuildConfig,
    ) -> Result<Option<String>, PluginError> {
        Ok(None)
    }

    /// Transform the Markdown source before it is converted.
    fn on_page_markdown(
        &self,
        markdown: String,
        _page: &mut Page,
        _config: &BuildConfig,
    ) -> Result<String, PluginError> {
        Ok(markdown)
    }

    /// Transform the page body after conversion, before templating.
    fn on_page_content(
        &self,
        html: String,
        _page: &mut Page,
        _config: &BuildConfig,
    ) -> Result<String, PluginError> {
        Ok(html)
    }

    /// Called once after every page has been written.
    fn on_post_build(&self, _config: &BuildConfig) -> Result<(), PluginError> {
        Ok(())
    }
}
