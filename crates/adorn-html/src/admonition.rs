//! Admonition blocks restyled for the site theme.
//!
//! The renderer emits a table with an icon cell and a content cell:
//!
//! ```html
//! <div class="admonitionblock warning"><table><tr>
//!   <td class="icon"><div class="title">Warning</div></td>
//!   <td class="content"><div class="title">Careful</div>Body</td>
//! </tr></table></div>
//! ```
//!
//! The theme expects a titled box instead:
//!
//! ```html
//! <div class="admonition warning"><p class="admonition-title">Careful</p>Body</div>
//! ```

use crate::dom::{tag_with_class, with_class, Element, Fragment, Node};

/// Admonition kinds, in the order they are checked against the class list.
pub const KINDS: [&str; 5] = ["note", "tip", "important", "caution", "warning"];

/// Rewrite every `div.admonitionblock` into the theme's admonition markup.
///
/// Only the renderer's own class is matched, so output of this pass is never
/// rewritten twice.
pub fn restyle_admonitions(fragment: &mut Fragment) {
    fragment
        .root_mut()
        .rewrite(&tag_with_class("div", "admonitionblock"), &mut restyle);
}

fn restyle(mut block: Element) -> Node {
    let kind = KINDS
        .iter()
        .copied()
        .find(|kind| block.has_class(kind))
        .unwrap_or("note");

    // Without a content cell the whole block is the body.
    let mut content = block.take_first(with_class("content")).unwrap_or(block);

    let title = match content.take_first(with_class("title")) {
        Some(title_el) => title_el.text(),
        None => capitalize(kind),
    };

    let mut admonition = Element::new("div")
        .with_attr("class", format!("admonition {kind}"))
        .with_child(
            Element::new("p")
                .with_attr("class", "admonition-title")
                .with_text(title),
        );
    admonition.children.append(&mut content.children);

    Node::Element(admonition)
}

/// Capitalize the first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
