//! Begin and end of TEI dating attributes

use oxrdf::Literal;

use crate::date::date_to_literal;
use crate::text::normalize_string;
use crate::xml::Element;

/// Attributes that may carry the start of a period, most specific first
const BEGIN_ATTRIBUTES: [&str; 4] = ["notBefore-iso", "notBefore", "from-iso", "from"];
/// Attributes that may carry the end of a period, most specific first
const END_ATTRIBUTES: [&str; 4] = ["notAfter-iso", "notAfter", "to-iso", "to"];
/// Point-in-time attributes used when a side has no bound of its own
const WHEN_ATTRIBUTES: [&str; 2] = ["when-iso", "when"];

/// Resolved start and end of a dated element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interval {
    pub begin: Option<String>,
    pub end: Option<String>,
}

impl Interval {
    pub fn new(begin: Option<String>, end: Option<String>) -> Self {
        Self { begin, end }
    }

    /// Both sides as typed date literals; absent sides become
    /// `"undefined"@en`
    pub fn to_literals(&self) -> (Literal, Literal) {
        (
            date_to_literal(self.begin.as_deref()),
            date_to_literal(self.end.as_deref()),
        )
    }
}

fn first_present(node: &Element, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| node.attribute(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Extract the interval of a dated element.
///
/// Each side takes its own bound attributes first and falls back to
/// `when-iso`/`when`. When neither side resolves, the element's
/// normalized text stands for both.
///
/// ```
/// # fn main() -> teigraph::Result<()> {
/// use teigraph::{extract_interval, Document};
/// let doc = Document::parse(
///     r#"<date notBefore-iso="1905-07-04" when="1955" to="2000">04.07.1905</date>"#,
/// )?;
/// let interval = extract_interval(&doc.root);
/// assert_eq!(interval.begin.as_deref(), Some("1905-07-04"));
/// assert_eq!(interval.end.as_deref(), Some("2000"));
/// # Ok(())
/// # }
/// ```
pub fn extract_interval(node: &Element) -> Interval {
    let when = first_present(node, &WHEN_ATTRIBUTES);
    let begin = first_present(node, &BEGIN_ATTRIBUTES).or_else(|| when.clone());
    let end = first_present(node, &END_ATTRIBUTES).or(when);

    if begin.is_none() && end.is_none() {
        let text = normalize_string(&node.inner_text());
        let text = (!text.is_empty()).then_some(text);
        return Interval::new(text.clone(), text);
    }
    Interval::new(begin, end)
}
