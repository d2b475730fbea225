//! Table of contents extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::dom::{Element, Fragment};

/// A heading in the page outline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingNode {
    /// Heading text
    pub title: String,
    /// Anchor ID (without `#`)
    pub id: String,
    /// Headings nested under this one
    pub children: Vec<HeadingNode>,
}

impl HeadingNode {
    /// Create a heading with no children.
    pub fn new(title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            children: Vec::new(),
        }
    }
}

/// Build the outline of a rendered document.
///
/// Collects `h1`..`h6` in document order, skipping the document title
/// (`h1.sect0`). Headings without an `id` get one derived from their text,
/// written back into the fragment so the outline's anchors resolve.
pub fn build_toc(fragment: &mut Fragment) -> Vec<HeadingNode> {
    let mut flat = Vec::new();

    fragment.root_mut().for_each_mut(&mut |el: &mut Element| {
        let Some(level) = heading_level(el) else {
            return;
        };
        if level == 1 && el.has_class("sect0") {
            return;
        }

        let title = el.text();
        let id = match el.attr("id") {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = slugify(&title);
                el.set_attr("id", id.clone());
                id
            }
        };
        flat.push((level, HeadingNode::new(title, id)));
    });

    nest(flat)
}

/// Fold a flat heading sequence into a forest.
///
/// Each heading becomes a child of the nearest preceding heading with a
/// lower level; a skipped level nests under that heading directly.
fn nest(flat: Vec<(u8, HeadingNode)>) -> Vec<HeadingNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<(u8, HeadingNode)> = Vec::new();

    for (level, node) in flat {
        while stack.last().is_some_and(|(top, _)| *top >= level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push((level, node));
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

/// Pop the top of the stack and attach it to its parent (or the roots).
fn close_top(stack: &mut Vec<(u8, HeadingNode)>, roots: &mut Vec<HeadingNode>) {
    let Some((_, node)) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn heading_level(el: &Element) -> Option<u8> {
    match el.name.as_str() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9a-z\s_-]+").expect("valid regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("valid regex"));

/// Convert heading text to an anchor slug.
///
/// Text made only of punctuation yields an empty string.
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let kept = NON_WORD.replace_all(&lower, "");
    SEPARATORS.replace_all(&kept, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titles(nodes: &[HeadingNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn nests_by_level_and_skips_document_title() {
        let mut frag = Fragment::parse(
            r#"<h1 class="sect0">Doc</h1>
<h2 id="a">A</h2>
<h3 id="a1">A1</h3>
<h2 id="b">B</h2>
<h4 id="b1">B1</h4>"#,
        );

        let toc = build_toc(&mut frag);

        assert_eq!(titles(&toc), vec!["A", "B"]);
        assert_eq!(titles(&toc[0].children), vec!["A1"]);
        assert_eq!(titles(&toc[1].children), vec!["B1"]);
        assert!(toc[1].children[0].children.is_empty());
    }

    #[test]
    fn shallower_heading_after_deeper_becomes_root() {
        let mut frag = Fragment::parse("<h3>Deep</h3><h2>Shallow</h2><h3>Under</h3>");
        let toc = build_toc(&mut frag);

        assert_eq!(titles(&toc), vec!["Deep", "Shallow"]);
        assert_eq!(titles(&toc[1].children), vec!["Under"]);
    }

    #[test]
    fn keeps_existing_ids() {
        let mut frag = Fragment::parse(r#"<h2 id="_install">Install</h2>"#);
        let toc = build_toc(&mut frag);
        assert_eq!(toc, vec![HeadingNode::new("Install", "_install")]);
    }

    #[test]
    fn assigns_missing_ids_in_the_document() {
        let mut frag = Fragment::parse("<h2>Getting Started, Fast!</h2>");
        let toc = build_toc(&mut frag);

        assert_eq!(toc[0].id, "getting-started-fast");
        assert_eq!(
            frag.to_html(),
            r#"<h2 id="getting-started-fast">Getting Started, Fast!</h2>"#
        );
    }

    #[test]
    fn slugify_is_stable() {
        assert_eq!(slugify("Getting Started, Fast!"), "getting-started-fast");
        assert_eq!(slugify("  snake_case   words "), "snake-case-words");
        assert_eq!(slugify("API v2"), "api-v2");
    }

    #[test]
    fn slugify_punctuation_only_is_empty() {
        assert_eq!(slugify("?!…"), "");
    }
}
