//! Attribute conditions for filtering selected elements

use crate::xml::Element;

/// True when the attribute `name` equals `value` or is absent.
///
/// Used to keep elements that either carry the wanted type or no type at
/// all, e.g. original names next to untyped names.
///
/// ```
/// # fn main() -> teigraph::Result<()> {
/// use teigraph::{matches_condition, Document};
/// let doc = Document::parse(r#"<placeName type="alt_label">Reval</placeName>"#)?;
/// assert!(!matches_condition(&doc.root, "type", "orig_name"));
/// assert!(matches_condition(&doc.root, "subtype", "orig_name"));
/// # Ok(())
/// # }
/// ```
pub fn matches_condition(node: &Element, name: &str, value: &str) -> bool {
    node.attribute(name).is_none_or(|found| found == value)
}
