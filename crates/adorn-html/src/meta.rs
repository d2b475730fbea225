//! Page metadata extraction from rendered HTML.

use std::collections::BTreeMap;

use crate::dom::{tag, tag_with_class, Element, Fragment};

/// Page metadata: `title` and `description` when the document provides them.
pub type Meta = BTreeMap<String, String>;

/// Extract the page title and description.
///
/// The title comes from the document title heading (`h1.sect0`), else the
/// first `h1`, else a `<title>` element. The description comes from a
/// `<meta name="description">` with non-empty content. Missing values are
/// simply left out.
pub fn extract_meta(fragment: &Fragment) -> Meta {
    let root = fragment.root();
    let mut meta = Meta::new();

    let title_el = root
        .find(tag_with_class("h1", "sect0"))
        .or_else(|| root.find(tag("h1")))
        .or_else(|| root.find(tag("title")));
    if let Some(el) = title_el {
        meta.insert("title".to_string(), el.text());
    }

    let description = root
        .find(|el: &Element| el.is("meta") && el.attr("name") == Some("description"))
        .and_then(|el| el.attr("content"))
        .filter(|content| !content.is_empty());
    if let Some(content) = description {
        meta.insert("description".to_string(), content.to_string());
    }

    meta
}
