//! Static site generator with AsciiDoc support.
//!
//! [`StaticBuilder`] builds a documentation site from a docs directory and
//! drives [`Plugin`] hooks at each stage. [`AsciiDocPlugin`] hooks in to
//! render `.adoc` pages through Asciidoctor.

pub mod asciidoc;
pub mod assets;
pub mod builder;
pub mod files;
pub mod hooks;
pub mod templates;

pub use asciidoc::{AsciiDocOptions, AsciiDocPlugin};
pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use files::{page_destination, FileKind, Files, SiteFile};
pub use hooks::{Page, Plugin, PluginError};
