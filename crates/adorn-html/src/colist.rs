//! Callout lists rendered as tables, rewritten as ordered lists.

use crate::dom::{tag, Element, Fragment, Node};

/// Replace the table inside each `div.colist` with `<ol class="colist">`.
///
/// Each row becomes one list item carrying the markup of its second cell.
/// Rows with fewer than two cells are skipped.
pub fn callout_tables_to_lists(fragment: &mut Fragment) {
    fragment
        .root_mut()
        .for_each_mut(&mut |el: &mut Element| {
            if el.is("div") && el.has_class("colist") {
                convert_colist(el);
            }
        });
}

fn convert_colist(colist: &mut Element) {
    let Some(table) = colist.find(tag("table")) else {
        return;
    };
    let rows = table.find_all(tag("tr"));
    if rows.is_empty() {
        return;
    }

    let mut list = Element::new("ol").with_attr("class", "colist");
    for row in rows {
        let cells = row.find_all(tag("td"));
        let Some(explanation) = cells.get(1) else {
            continue;
        };
        let mut item = Element::new("li");
        item.children = explanation.children.clone();
        list.children.push(Node::Element(item));
    }

    colist.replace_first(tag("table"), |_| Node::Element(list));
}
