//! Rendered document model.

use adorn_html::{build_toc, escape_html, extract_meta, Fragment, HeadingNode, Meta};

/// The result of rendering one source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedDocument {
    /// Renderer HTML with heading anchors filled in
    pub html: String,

    /// Heading outline, excluding the document title
    pub toc: Vec<HeadingNode>,

    /// `title` and `description`, when present
    pub meta: Meta,
}

impl RenderedDocument {
    /// Analyze renderer output: extract metadata and the outline.
    ///
    /// Works on the renderer's native markup, before any theme
    /// normalization.
    pub fn from_html(html: &str) -> Self {
        let mut fragment = Fragment::parse(html);
        let meta = extract_meta(&fragment);
        let toc = build_toc(&mut fragment);

        Self {
            html: fragment.to_html(),
            toc,
            meta,
        }
    }

    /// A page body standing in for a failed render.
    pub fn placeholder(message: &str) -> Self {
        Self {
            html: format!("<pre>{}</pre>", escape_html(message)),
            toc: Vec::new(),
            meta: Meta::new(),
        }
    }

    /// Page title, if the document has one.
    pub fn title(&self) -> Option<&str> {
        self.meta.get("title").map(String::as_str)
    }
}
