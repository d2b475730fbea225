//! HTML5 fragment parsing using html5ever.

use html5ever::tendril::TendrilSink;
use html5ever::{local_name, parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::dom::{Element, Fragment, Node};

/// Document shell the fragment is parsed into. Opening `<body>` explicitly
/// keeps head-only elements such as `<meta>` and `<title>` in place.
const SHELL: &str = "<!DOCTYPE html><html><head></head><body>";

/// Parse an HTML fragment as if it were the contents of `<body>`.
///
/// Never fails: malformed markup is recovered the way browsers do.
pub fn parse_fragment(html: &str) -> Fragment {
    let mut source = String::with_capacity(SHELL.len() + html.len());
    source.push_str(SHELL);
    source.push_str(html);

    let dom: RcDom = parse_document(RcDom::default(), ParseOpts::default()).one(source);

    let nodes = find_body(&dom.document)
        .map(|body| {
            body.children
                .borrow()
                .iter()
                .filter_map(convert_node)
                .collect()
        })
        .unwrap_or_default();

    Fragment::from_nodes(nodes)
}

/// The `<body>` element, depth first.
fn find_body(handle: &Handle) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if let NodeData::Element { name, .. } = &child.data {
            if name.local == local_name!("body") {
                return Some(child.clone());
            }
        }
        if let Some(body) = find_body(child) {
            return Some(body);
        }
    }
    None
}

/// Convert an html5ever node into our tree.
fn convert_node(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),

        NodeData::Comment { contents } => Some(Node::Comment(contents.to_string())),

        NodeData::Element { name, attrs, .. } => {
            let mut element = Element::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                let name = match &attr.name.prefix {
                    Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                    None => attr.name.local.to_string(),
                };
                element.attrs.push((name, attr.value.to_string()));
            }
            for child in handle.children.borrow().iter() {
                if let Some(node) = convert_node(child) {
                    element.children.push(node);
                }
            }
            Some(Node::Element(element))
        }

        // Doctypes, processing instructions, and nested documents carry nothing
        // a page body needs.
        NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
            None
        }
    }
}
