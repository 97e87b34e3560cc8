//! XML data model

use std::fmt;

use crate::xml::namespace::NamespaceMap;
use crate::xml::XML_LANG;

/// Namespace-qualified name of an element or attribute
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
    pub namespace: Option<String>,
}

impl QName {
    pub fn new(prefix: Option<String>, local: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            prefix,
            local: local.into(),
            namespace,
        }
    }

    /// Name as written in the source, `prefix:local` or `local`
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.local),
            None => self.local.clone(),
        }
    }

    /// Clark notation, `{namespace}local`
    pub fn clark(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{ns}}}{}", self.local),
            None => self.local.clone(),
        }
    }

    /// Match against a source-form name (`xml:id`), a Clark name
    /// (`{http://www.w3.org/XML/1998/namespace}id`) or a bare local name
    /// for names without a prefix.
    pub fn matches(&self, name: &str) -> bool {
        if let Some(rest) = name.strip_prefix('{') {
            return match rest.split_once('}') {
                Some((ns, local)) => self.namespace.as_deref() == Some(ns) && self.local == local,
                None => false,
            };
        }
        match (&self.prefix, name.split_once(':')) {
            (Some(prefix), Some((p, local))) => prefix == p && self.local == local,
            (None, None) => self.local == name,
            _ => false,
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// XML attribute
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// Parsed XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
    /// Bindings declared on the root element
    pub namespaces: NamespaceMap,
    /// `namespaces` with the default namespace bound to the configured alias
    pub query_namespaces: NamespaceMap,
}

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Content>,
    /// Namespace declarations made on this element
    pub declared: NamespaceMap,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Element {
    /// Local part of the tag name
    pub fn tag(&self) -> &str {
        &self.name.local
    }

    /// Look up an attribute value by source name, Clark name or local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.matches(name))
            .map(|attr| attr.value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// `xml:lang` of this element, if declared and non-empty
    pub fn lang(&self) -> Option<&str> {
        self.attribute(XML_LANG)
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
    }

    /// Direct element children in document order
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }

    /// Text directly inside this element, without descendant text
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Content::Text(text) => Some(text.as_str()),
                Content::Element(_) => None,
            })
            .collect()
    }

    /// Direct and descendant text concatenated in document order
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let mut stack: Vec<&Content> = self.children.iter().rev().collect();
        while let Some(content) = stack.pop() {
            match content {
                Content::Text(text) => out.push_str(text),
                Content::Element(element) => stack.extend(element.children.iter().rev()),
            }
        }
    }

    /// This element followed by all descendant elements, in document order
    pub fn descendants_or_self(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(element) = stack.pop() {
            out.push(element);
            // reversed so the first child is popped next
            stack.extend(element.child_elements().rev());
        }
        out
    }
}
