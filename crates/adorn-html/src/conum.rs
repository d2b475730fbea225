//! Copy-safe callout markers inside code listings.
//!
//! Callout numbers must stay visible next to code but never end up in the
//! clipboard. The renderer can emit them three ways depending on its icon
//! mode, and all three are handled:
//!
//! - `<b class="conum">(1)</b>`: text fallback, removed
//! - `<i class="conum" data-value="1"></i><b>(1)</b>`: icon kept but emptied
//!   and hidden from assistive technology, its `<b>` fallback removed
//! - literal `(1)` or `<1>` at the end of a line, stripped

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{Element, Fragment, Node};

/// A callout marker at the end of a line of listing text.
static TRAILING_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(?:^|[ \t]+)(?:\(\d+\)|<\d+>)[ \t]*$").expect("valid regex")
});

/// Neutralize callout markers in every `div.listingblock pre`.
pub fn make_callouts_copy_safe(fragment: &mut Fragment) {
    fragment
        .root_mut()
        .for_each_mut(&mut |block: &mut Element| {
            if block.is("div") && block.has_class("listingblock") {
                block.for_each_mut(&mut |el: &mut Element| {
                    if el.is("pre") {
                        sanitize_listing(el);
                    }
                });
            }
        });
}

fn sanitize_listing(pre: &mut Element) {
    strip_markers(&mut pre.children);
    strip_trailing_markers(pre);
}

/// Strip literal markers from the text runs of a listing.
///
/// Highlighters split a line across many elements, so a line ends either at
/// a newline or where the next text run starts with one. The last run of the
/// listing always ends a line.
fn strip_trailing_markers(pre: &mut Element) {
    let mut runs = Vec::new();
    collect_text(&mut pre.children, &mut runs);

    let ends_line: Vec<bool> = (0..runs.len())
        .map(|i| runs.get(i + 1).is_none_or(|next| next.starts_with('\n')))
        .collect();

    for (text, ends_line) in runs.into_iter().zip(ends_line) {
        let cleaned = if ends_line {
            TRAILING_MARKER.replace_all(text, "").into_owned()
        } else if let Some(pos) = text.rfind('\n') {
            let (lines, rest) = text.split_at(pos);
            format!("{}{rest}", TRAILING_MARKER.replace_all(lines, ""))
        } else {
            continue;
        };
        if cleaned != *text {
            *text = cleaned;
        }
    }
}

fn collect_text<'a>(nodes: &'a mut [Node], out: &mut Vec<&'a mut String>) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push(text),
            Node::Element(el) => collect_text(&mut el.children, out),
            Node::Comment(_) => {}
        }
    }
}

fn is_conum(el: &Element) -> bool {
    el.has_class("conum")
}

fn is_icon_marker(node: &Node) -> bool {
    matches!(node, Node::Element(el) if is_conum(el) && el.has_attr("data-value"))
}

/// Remove text fallbacks and empty the icon markers, recursively.
fn strip_markers(nodes: &mut Vec<Node>) {
    let mut after_icon = false;
    nodes.retain(|node| {
        let keep = match node {
            Node::Element(el) if is_conum(el) && !el.has_attr("data-value") => false,
            Node::Element(el) if after_icon && el.is("b") => false,
            _ => true,
        };
        after_icon = keep && is_icon_marker(node);
        keep
    });

    for node in nodes.iter_mut() {
        let Node::Element(el) = node else {
            continue;
        };
        if is_conum(el) {
            el.clear();
            el.set_attr("aria-hidden", "true");
        } else {
            strip_markers(&mut el.children);
        }
    }
}
