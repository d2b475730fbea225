//! Theme normalization of rendered AsciiDoc.

use crate::admonition::restyle_admonitions;
use crate::colist::callout_tables_to_lists;
use crate::conum::make_callouts_copy_safe;
use crate::dom::Fragment;

/// Parse, normalize, and serialize rendered HTML.
///
/// Run this after metadata and outline extraction: those read the
/// renderer's native markup, which normalization replaces.
pub fn normalize(html: &str) -> String {
    let mut fragment = Fragment::parse(html);
    normalize_fragment(&mut fragment);
    fragment.to_html()
}

/// Apply all normalization passes to an already parsed fragment.
///
/// The passes touch disjoint element classes, so their order does not
/// matter. Running them again on their own output changes nothing.
pub fn normalize_fragment(fragment: &mut Fragment) {
    restyle_admonitions(fragment);
    callout_tables_to_lists(fragment);
    make_callouts_copy_safe(fragment);
}
