//! URIs derived from elements

use oxrdf::NamedNode;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, ErrorKind, Result};
use crate::xml::Element;

/// Which value a sequence component contributes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    /// Fixed text, typically a base URI
    Prefix(String),
    /// Value of the named attribute on the element
    Attribute(String),
    Number(usize),
}

/// One component of a custom URI with its position in the result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceComponent {
    pub order: usize,
    pub kind: ComponentKind,
}

impl SequenceComponent {
    pub fn new(order: usize, kind: ComponentKind) -> Self {
        Self { order, kind }
    }

    pub fn prefix(order: usize, prefix: impl Into<String>) -> Self {
        Self::new(order, ComponentKind::Prefix(prefix.into()))
    }

    pub fn attribute(order: usize, name: impl Into<String>) -> Self {
        Self::new(order, ComponentKind::Attribute(name.into()))
    }

    pub fn number(order: usize, number: usize) -> Self {
        Self::new(order, ComponentKind::Number(number))
    }
}

/// Append `segment` to `uri` with exactly one `/` between them
fn push_segment(uri: &mut String, segment: &str) {
    let segment = segment.trim_start_matches('/');
    if segment.is_empty() {
        return;
    }
    if uri.is_empty() {
        uri.push_str(segment);
        return;
    }
    while uri.ends_with('/') {
        uri.pop();
    }
    uri.push('/');
    uri.push_str(segment);
}

fn named_node(iri: String) -> Result<NamedNode> {
    NamedNode::new(iri.as_str())
        .map_err(|_| Error::unlocated(ErrorKind::InvalidIri { iri }))
}

/// URI `prefix + tag`, extended by `/attribute-value` (when the attribute
/// is given and present), `/number` and a random `/uuid` suffix.
///
/// ```
/// # fn main() -> teigraph::Result<()> {
/// use teigraph::{build_uri_from_tag, Document};
/// let doc = Document::parse(r#"<person xml:id="DWpers0091"/>"#)?;
/// let uri = build_uri_from_tag(&doc.root, "http://example.com/", Some("xml:id"), Some(1), false)?;
/// assert_eq!(uri.as_str(), "http://example.com/person/DWpers0091/1");
/// # Ok(())
/// # }
/// ```
pub fn build_uri_from_tag(
    node: &Element,
    prefix: &str,
    attribute: Option<&str>,
    number: Option<usize>,
    random_suffix: bool,
) -> Result<NamedNode> {
    let mut uri = format!("{prefix}{}", node.tag());
    if let Some(value) = attribute.and_then(|name| node.attribute(name)) {
        push_segment(&mut uri, value);
    }
    if let Some(number) = number {
        push_segment(&mut uri, &number.to_string());
    }
    if random_suffix {
        push_segment(&mut uri, &Uuid::new_v4().to_string());
    }
    named_node(uri)
}

/// Check that the order indices are exactly `0..n`
fn validate_orders(components: &[SequenceComponent]) -> Result<()> {
    let mut orders: Vec<usize> = components.iter().map(|c| c.order).collect();
    orders.sort_unstable();
    if orders.iter().enumerate().all(|(idx, order)| idx == *order) {
        Ok(())
    } else {
        Err(Error::unlocated(ErrorKind::InvalidSequence {
            orders: components.iter().map(|c| c.order).collect(),
        }))
    }
}

/// URI assembled from components ordered by their `order` index and joined
/// with `/`. Attribute components the element lacks are skipped.
pub fn build_uri_from_sequence(
    node: &Element,
    components: &[SequenceComponent],
) -> Result<NamedNode> {
    validate_orders(components)?;

    let mut ordered: Vec<&SequenceComponent> = components.iter().collect();
    ordered.sort_by_key(|c| c.order);

    let mut uri = String::new();
    for component in ordered {
        match &component.kind {
            ComponentKind::Prefix(prefix) => push_segment(&mut uri, prefix),
            ComponentKind::Attribute(name) => match node.attribute(name) {
                Some(value) => push_segment(&mut uri, value),
                None => debug!(attribute = %name, tag = node.tag(), "attribute missing, component skipped"),
            },
            ComponentKind::Number(number) => push_segment(&mut uri, &number.to_string()),
        }
    }
    named_node(uri)
}
