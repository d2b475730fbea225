//! HTML processing for rendered AsciiDoc.
//!
//! This crate parses the renderer's HTML into a small owned tree, extracts
//! page metadata and the heading outline, and rewrites renderer-specific
//! markup into the site theme's conventions.

pub mod admonition;
pub mod colist;
pub mod conum;
pub mod dom;
pub mod meta;
pub mod normalize;
pub mod parser;
pub mod serialize;
pub mod toc;

pub use dom::{Element, Fragment, Node};
pub use meta::{extract_meta, Meta};
pub use normalize::{normalize, normalize_fragment};
pub use serialize::escape_html;
pub use toc::{build_toc, slugify, HeadingNode};
