//! A small owned HTML tree with the queries the normalizer needs.
//!
//! Renderer output is parsed once into [`Fragment`], rewritten in place, and
//! serialized back. The tree deliberately knows nothing about any parser's
//! node handles so passes can move subtrees around freely.

use crate::parser::parse_fragment;
use crate::serialize::{serialize_children, serialize_element};

/// A node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with its attributes and children
    Element(Element),
    /// Decoded character data
    Text(String),
    /// A comment (contents only)
    Comment(String),
}

impl Node {
    /// Borrow the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An HTML element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Lowercase tag name
    pub name: String,

    /// Attributes in source order
    pub attrs: Vec<(String, String)>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder-style text append.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Whether this element has the given tag name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether an attribute is present, regardless of its value.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == name)
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Iterate the whitespace-separated class list.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Text content: every descendant text run trimmed, empty runs dropped,
    /// the rest joined with single spaces.
    pub fn text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Node::Text(t) => {
                    let t = t.trim();
                    if !t.is_empty() {
                        parts.push(t);
                    }
                }
                Node::Element(el) => el.collect_text(parts),
                Node::Comment(_) => {}
            }
        }
    }

    /// Concatenated raw text of all descendants, whitespace untouched.
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        self.push_raw_text(&mut out);
        out
    }

    fn push_raw_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(t),
                Node::Element(el) => el.push_raw_text(out),
                Node::Comment(_) => {}
            }
        }
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First descendant element (document order) matching `pred`.
    pub fn find<P>(&self, pred: P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        self.find_by(&pred)
    }

    fn find_by<P>(&self, pred: &P) -> Option<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        for child in self.child_elements() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_by(pred) {
                return Some(found);
            }
        }
        None
    }

    /// All descendant elements (document order) matching `pred`.
    pub fn find_all<P>(&self, pred: P) -> Vec<&Element>
    where
        P: Fn(&Element) -> bool,
    {
        let mut out = Vec::new();
        self.find_all_by(&pred, &mut out);
        out
    }

    fn find_all_by<'a, P>(&'a self, pred: &P, out: &mut Vec<&'a Element>)
    where
        P: Fn(&Element) -> bool,
    {
        for child in self.child_elements() {
            if pred(child) {
                out.push(child);
            }
            child.find_all_by(pred, out);
        }
    }

    /// Detach the first descendant matching `pred` and return it.
    pub fn take_first<P>(&mut self, pred: P) -> Option<Element>
    where
        P: Fn(&Element) -> bool,
    {
        self.take_first_by(&pred)
    }

    fn take_first_by<P>(&mut self, pred: &P) -> Option<Element>
    where
        P: Fn(&Element) -> bool,
    {
        for i in 0..self.children.len() {
            let Node::Element(el) = &mut self.children[i] else {
                continue;
            };
            if pred(el) {
                return match self.children.remove(i) {
                    Node::Element(el) => Some(el),
                    _ => None,
                };
            }
            if let Some(found) = el.take_first_by(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Replace the first descendant matching `pred` with whatever `f`
    /// builds from it. Returns whether a replacement happened.
    pub fn replace_first<P, F>(&mut self, pred: P, f: F) -> bool
    where
        P: Fn(&Element) -> bool,
        F: FnOnce(Element) -> Node,
    {
        let mut f = Some(f);
        self.replace_first_by(&pred, &mut f)
    }

    fn replace_first_by<P, F>(&mut self, pred: &P, f: &mut Option<F>) -> bool
    where
        P: Fn(&Element) -> bool,
        F: FnOnce(Element) -> Node,
    {
        for child in &mut self.children {
            let Node::Element(el) = child else {
                continue;
            };
            if pred(el) {
                let Some(build) = f.take() else {
                    return false;
                };
                let taken = std::mem::take(el);
                *child = build(taken);
                return true;
            }
            if el.replace_first_by(pred, f) {
                return true;
            }
        }
        false
    }

    /// Bottom-up rewrite: every descendant matching `pred` is replaced by the
    /// node `f` builds from it. Children are rewritten before their parent.
    pub fn rewrite<P, F>(&mut self, pred: &P, f: &mut F)
    where
        P: Fn(&Element) -> bool,
        F: FnMut(Element) -> Node,
    {
        for child in &mut self.children {
            let Node::Element(el) = child else {
                continue;
            };
            el.rewrite(pred, f);
            if pred(el) {
                let taken = std::mem::take(el);
                *child = f(taken);
            }
        }
    }

    /// Visit every descendant element, parents before children.
    pub fn for_each_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                f(el);
                el.for_each_mut(f);
            }
        }
    }

    /// Drop all children.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Serialize the children of this element.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        serialize_children(&self.children, &mut out);
        out
    }

    /// Serialize this element including its own tags.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        serialize_element(self, &mut out);
        out
    }
}

/// A parsed HTML fragment (the renderer's embeddable body output).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    root: Element,
}

impl Fragment {
    /// Parse an HTML fragment.
    pub fn parse(html: &str) -> Self {
        parse_fragment(html)
    }

    /// Wrap top-level nodes into a fragment.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            root: Element {
                name: String::new(),
                attrs: Vec::new(),
                children: nodes,
            },
        }
    }

    /// Unwrap the top-level nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.root.children
    }

    /// The nameless container holding the top-level nodes.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the container.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Serialize back to HTML.
    pub fn to_html(&self) -> String {
        self.root.inner_html()
    }
}

/// Predicate: tag name and class both match.
pub fn tag_with_class<'a>(tag: &'a str, class: &'a str) -> impl Fn(&Element) -> bool + 'a {
    move |el| el.is(tag) && el.has_class(class)
}

/// Predicate: class matches, any tag.
pub fn with_class(class: &str) -> impl Fn(&Element) -> bool + '_ {
    move |el| el.has_class(class)
}

/// Predicate: tag name matches.
pub fn tag(name: &str) -> impl Fn(&Element) -> bool + '_ {
    move |el| el.is(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Fragment {
        Fragment::parse(
            r#"<div class="a b"><p id="x">One <em>two</em></p><p class="b">three</p></div><span class="b">four</span>"#,
        )
    }

    #[test]
    fn reads_classes_and_attrs() {
        let frag = sample();
        let div = frag.root().find(tag("div")).unwrap();
        assert!(div.has_class("a"));
        assert!(div.has_class("b"));
        assert!(!div.has_class("c"));
        let p = div.find(tag("p")).unwrap();
        assert_eq!(p.attr("id"), Some("x"));
    }

    #[test]
    fn text_joins_trimmed_runs() {
        let frag = sample();
        let p = frag.root().find(tag("p")).unwrap();
        assert_eq!(p.text(), "One two");
    }

    #[test]
    fn finds_all_in_document_order() {
        let frag = sample();
        let found: Vec<String> = frag
            .root()
            .find_all(with_class("b"))
            .iter()
            .map(|el| el.name.clone())
            .collect();
        assert_eq!(found, vec!["div", "p", "span"]);
    }

    #[test]
    fn take_first_detaches_node() {
        let mut frag = sample();
        let p = frag.root_mut().take_first(tag_with_class("p", "b")).unwrap();
        assert_eq!(p.text(), "three");
        assert!(frag.root().find(tag_with_class("p", "b")).is_none());
    }

    #[test]
    fn replace_first_swaps_subtree() {
        let mut frag = sample();
        let replaced = frag
            .root_mut()
            .replace_first(tag("span"), |_| Element::new("b").with_text("bold").into());
        assert!(replaced);
        assert!(frag.to_html().ends_with("<b>bold</b>"));
    }

    #[test]
    fn rewrite_runs_bottom_up() {
        let mut frag = Fragment::parse("<div><div><p>x</p></div></div>");
        let mut seen = Vec::new();
        frag.root_mut().rewrite(&tag("div"), &mut |el: Element| {
            seen.push(el.inner_html());
            Element::new("section").with_child(Node::Text(el.text())).into()
        });
        assert_eq!(seen, vec!["<p>x</p>", "<section>x</section>"]);
        assert_eq!(frag.to_html(), "<section>x</section>");
    }

    #[test]
    fn set_attr_replaces_existing() {
        let mut el = Element::new("i").with_attr("class", "conum");
        el.set_attr("class", "other");
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(el.attr("class"), Some("other"));
    }
}
