//! AsciiDoc rendering through an external renderer, with a render cache.
//!
//! [`Asciidoctor`] shells out to the `asciidoctor` command; [`RenderCache`]
//! sits in front of any [`Backend`] and skips renders for unchanged files.

pub mod backend;
pub mod cache;
pub mod config;
pub mod document;

pub use backend::{Asciidoctor, Backend, RenderError};
pub use cache::{CacheEntry, FileStamp, RenderCache};
pub use config::{RenderConfig, SafeMode};
pub use document::RenderedDocument;
