//! Path evaluation over the element tree

use std::collections::{HashMap, HashSet};

use crate::xml::model::Element;
use crate::xml::path::{Axis, NodeTest, Predicate, Step, XPath};

/// Node in an evaluation context. The document node is the virtual parent
/// of the root element.
#[derive(Clone, Copy, Debug)]
enum NodeRef<'a> {
    Document(&'a Element),
    Element(&'a Element),
}

impl<'a> NodeRef<'a> {
    fn element(self) -> Option<&'a Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Document(_) => None,
        }
    }

    fn key(self) -> (*const Element, bool) {
        match self {
            Self::Document(root) => (std::ptr::from_ref(root), true),
            Self::Element(element) => (std::ptr::from_ref(element), false),
        }
    }

    fn children(self) -> Vec<Self> {
        match self {
            Self::Document(root) => vec![Self::Element(root)],
            Self::Element(element) => element.child_elements().map(Self::Element).collect(),
        }
    }

    fn descendants(self) -> Vec<Self> {
        // the document node's descendants include the root element itself
        let (root, skip) = match self {
            Self::Document(root) => (root, 0),
            Self::Element(element) => (element, 1),
        };
        root.descendants_or_self()
            .into_iter()
            .skip(skip)
            .map(Self::Element)
            .collect()
    }

    fn axis(self, axis: Axis) -> Vec<Self> {
        match axis {
            Axis::Child => self.children(),
            Axis::Descendant => self.descendants(),
            Axis::DescendantOrSelf => {
                let mut nodes = vec![self];
                nodes.extend(self.descendants());
                nodes
            }
            Axis::SelfAxis => vec![self],
        }
    }
}

fn matches_test(node: NodeRef<'_>, test: &NodeTest) -> bool {
    let Some(element) = node.element() else {
        return matches!(test, NodeTest::Node);
    };
    match test {
        NodeTest::Node | NodeTest::AnyElement => true,
        NodeTest::Namespace(namespace) => element.name.namespace.as_deref() == Some(namespace),
        NodeTest::Name { namespace, local } => {
            element.name.local == *local && element.name.namespace == *namespace
        }
    }
}

fn apply_predicate<'a>(nodes: Vec<NodeRef<'a>>, predicate: &Predicate) -> Vec<NodeRef<'a>> {
    match predicate {
        Predicate::Position(n) => nodes.into_iter().nth(n.saturating_sub(1)).into_iter().collect(),
        Predicate::Last => nodes.into_iter().last().into_iter().collect(),
        Predicate::All(conditions) => nodes
            .into_iter()
            .filter(|node| {
                node.element()
                    .is_some_and(|element| conditions.iter().all(|c| c.holds(element)))
            })
            .collect(),
    }
}

fn apply_step<'a>(context: &[NodeRef<'a>], step: &Step) -> Vec<NodeRef<'a>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for &node in context {
        let mut candidates: Vec<NodeRef<'a>> = node
            .axis(step.axis)
            .into_iter()
            .filter(|candidate| matches_test(*candidate, &step.test))
            .collect();
        for predicate in &step.predicates {
            candidates = apply_predicate(candidates, predicate);
        }
        for candidate in candidates {
            if seen.insert(candidate.key()) {
                out.push(candidate);
            }
        }
    }
    out
}

/// Restore document order after steps that fan out from nested contexts
fn sort_document_order<'a>(start: NodeRef<'a>, nodes: &mut [NodeRef<'a>]) {
    let order: HashMap<(*const Element, bool), usize> = start
        .axis(Axis::DescendantOrSelf)
        .into_iter()
        .enumerate()
        .map(|(idx, node)| (node.key(), idx))
        .collect();
    nodes.sort_by_key(|node| order.get(&node.key()).copied().unwrap_or(usize::MAX));
}

impl XPath {
    fn evaluate<'a>(&self, start: NodeRef<'a>) -> Vec<&'a Element> {
        let start = match (self.absolute, start) {
            (true, NodeRef::Element(root)) => NodeRef::Document(root),
            (_, start) => start,
        };
        let mut nodes = vec![start];
        for step in &self.steps {
            let fan_out = nodes.len() > 1;
            nodes = apply_step(&nodes, step);
            if fan_out && nodes.len() > 1 {
                sort_document_order(start, &mut nodes);
            }
            if nodes.is_empty() {
                break;
            }
        }
        nodes.into_iter().filter_map(NodeRef::element).collect()
    }

    /// All matching elements in document order. Absolute paths treat
    /// `context` as the document root.
    pub fn select_all<'a>(&self, context: &'a Element) -> Vec<&'a Element> {
        self.evaluate(NodeRef::Element(context))
    }

    /// First matching element in document order
    pub fn select_one<'a>(&self, context: &'a Element) -> Option<&'a Element> {
        self.select_all(context).into_iter().next()
    }

    /// Evaluate from the document node above `root`
    pub fn select_from_root<'a>(&self, root: &'a Element) -> Vec<&'a Element> {
        self.evaluate(NodeRef::Document(root))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Result;
    use crate::xml::namespace::NamespaceMap;
    use crate::xml::parser::Parser;
    use crate::xml::path::XPath;

    const SAMPLE: &[u8] = br#"<TEI xmlns="http://www.tei-c.org/ns/1.0" xmlns:x="urn:x">
  <place xml:id="p1">
    <placeName type="orig_name">Reval</placeName>
    <placeName xml:lang="de" type="simple_name">Reval</placeName>
    <placeName>Tallinn</placeName>
  </place>
  <place xml:id="p2">
    <placeName type="orig_name">Jaworzno</placeName>
    <location><geo>1 2</geo></location>
    <place xml:id="p3"><placeName>Inner</placeName></place>
  </place>
  <x:note>plain</x:note>
  <note>unqualified</note>
</TEI>"#;

    fn ids(elements: &[&crate::xml::Element]) -> Vec<String> {
        elements
            .iter()
            .map(|e| e.attribute("xml:id").unwrap_or(e.tag()).to_string())
            .collect()
    }

    fn query(doc: &crate::xml::Document, expr: &str) -> Result<XPath> {
        XPath::compile(expr, &doc.query_namespaces)
    }

    #[test]
    fn test_absolute_descendants_in_document_order() -> Result<()> {
        let doc = Parser::new(SAMPLE).parse()?;
        let found = query(&doc, "//tei:place")?.select_from_root(&doc.root);
        assert_eq!(ids(&found), vec!["p1", "p2", "p3"]);
        Ok(())
    }

    #[test]
    fn test_absolute_child_from_root() -> Result<()> {
        let doc = Parser::new(SAMPLE).parse()?;
        let found = query(&doc, "/tei:TEI/tei:place")?.select_from_root(&doc.root);
        assert_eq!(ids(&found), vec!["p1", "p2"]);
        Ok(())
    }

    #[test]
    fn test_relative_with_attribute_predicates() -> Result<()> {
        let doc = Parser::new(SAMPLE).parse()?;
        let place = query(&doc, "./tei:place[@xml:id='p1']")?
            .select_one(&doc.root)
            .ok_or_else(|| crate::Error::unlocated(crate::ErrorKind::Parse))?;

        let orig = query(&doc, "./tei:placeName[@type='orig_name']")?.select_all(place);
        assert_eq!(orig.len(), 1);
        assert_eq!(orig[0].inner_text(), "Reval");

        let untyped = query(&doc, "tei:placeName[not(@type)]")?.select_all(place);
        assert_eq!(untyped.len(), 1);
        assert_eq!(untyped[0].inner_text(), "Tallinn");

        let other = query(&doc, "tei:placeName[@type!='orig_name']")?.select_all(place);
        assert_eq!(other.len(), 1);

        let lang = query(&doc, "tei:placeName[@xml:lang and @type]")?.select_all(place);
        assert_eq!(lang.len(), 1);
        Ok(())
    }

    #[test]
    fn test_positional_predicates_per_context() -> Result<()> {
        let doc = Parser::new(SAMPLE).parse()?;
        let first = query(&doc, "//tei:place/tei:placeName[1]")?.select_all(&doc.root);
        let texts: Vec<String> = first.iter().map(|e| e.inner_text()).collect();
        assert_eq!(texts, vec!["Reval", "Jaworzno", "Inner"]);

        let last = query(&doc, "tei:place[last()]")?.select_all(&doc.root);
        assert_eq!(ids(&last), vec!["p2"]);
        Ok(())
    }

    #[test]
    fn test_namespace_rules() -> Result<()> {
        let doc = Parser::new(SAMPLE).parse()?;
        let qualified = query(&doc, "x:note")?.select_all(&doc.root);
        assert_eq!(qualified.len(), 1);
        // the unprefixed <note> inherits the TEI default namespace
        let unprefixed = query(&doc, "note")?.select_all(&doc.root);
        assert!(unprefixed.is_empty());
        let tei_notes = query(&doc, "tei:note")?.select_all(&doc.root);
        assert_eq!(tei_notes.len(), 1);
        let any_x = query(&doc, "x:*")?.select_all(&doc.root);
        assert_eq!(any_x.len(), 1);
        Ok(())
    }

    #[test]
    fn test_nested_descendants_are_deduplicated() -> Result<()> {
        let doc = Parser::new(SAMPLE).parse()?;
        let names = query(&doc, "//tei:place//tei:placeName")?.select_from_root(&doc.root);
        assert_eq!(names.len(), 5);
        Ok(())
    }

    #[test]
    fn test_no_match_is_empty() -> Result<()> {
        let doc = Parser::new(SAMPLE).parse()?;
        let path = XPath::compile(".//tei:person", &doc.query_namespaces)?;
        assert!(path.select_all(&doc.root).is_empty());
        assert!(path.select_one(&doc.root).is_none());
        let without_ns = Parser::new(b"<r><a/></r>").parse()?;
        let path = XPath::compile("a", &NamespaceMap::new())?;
        assert_eq!(path.select_all(&without_ns.root).len(), 1);
        Ok(())
    }
}
