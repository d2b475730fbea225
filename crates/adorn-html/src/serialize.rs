//! HTML serialization for the owned tree.
//!
//! Output follows the HTML5 fragment serialization algorithm closely enough
//! that parsing the result yields the same tree again.

use crate::dom::{Element, Node};

/// Elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are emitted without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "plaintext", "script", "style", "xmp",
];

/// Elements where the parser drops a newline directly after the start tag.
const LEADING_NEWLINE_ELEMENTS: &[&str] = &["listing", "pre", "textarea"];

/// Serialize a list of sibling nodes.
pub fn serialize_children(nodes: &[Node], out: &mut String) {
    for node in nodes {
        serialize_node(node, false, out);
    }
}

/// Serialize an element including its start and end tags.
pub fn serialize_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.name.as_str()) {
        return;
    }

    if LEADING_NEWLINE_ELEMENTS.contains(&el.name.as_str()) {
        if let Some(Node::Text(first)) = el.children.first() {
            if first.starts_with('\n') {
                out.push('\n');
            }
        }
    }

    let raw = RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
    for child in &el.children {
        serialize_node(child, raw, out);
    }

    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn serialize_node(node: &Node, raw: bool, out: &mut String) {
    match node {
        Node::Element(el) => serialize_element(el, out),
        Node::Text(text) if raw => out.push_str(text),
        Node::Text(text) => escape_text(text, out),
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Escape a plain string for inclusion as HTML text.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_text(text, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Fragment;
    use pretty_assertions::assert_eq;

    fn roundtrip(html: &str) -> String {
        Fragment::parse(html).to_html()
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        assert_eq!(roundtrip("<p>a<br>b</p>"), "<p>a<br>b</p>");
        assert_eq!(
            roundtrip(r#"<img src="x.png" alt="x">"#),
            r#"<img src="x.png" alt="x">"#
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let el = Element::new("a")
            .with_attr("title", "say \"hi\" & go")
            .with_text("1 < 2 & 3 > 2");
        assert_eq!(
            el.outer_html(),
            r#"<a title="say &quot;hi&quot; &amp; go">1 &lt; 2 &amp; 3 &gt; 2</a>"#
        );
    }

    #[test]
    fn keeps_namespaced_attributes() {
        let svg = r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 10 10"><use xlink:href="#icon"></use></svg>"##;
        assert_eq!(roundtrip(svg), svg);
    }

    #[test]
    fn keeps_script_bodies_raw() {
        assert_eq!(
            roundtrip("<script>if (a < b) {}</script>"),
            "<script>if (a < b) {}</script>"
        );
    }

    #[test]
    fn preserves_leading_newline_in_pre() {
        let once = roundtrip("<pre>\n\nfirst</pre>");
        assert_eq!(once, "<pre>\n\nfirst</pre>");
        assert_eq!(roundtrip(&once), once);
    }

    #[test]
    fn escape_html_handles_markup() {
        assert_eq!(escape_html("<b>&</b>"), "&lt;b&gt;&amp;&lt;/b&gt;");
    }
}
