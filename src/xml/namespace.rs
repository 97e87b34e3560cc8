//! Namespace maps and scoped prefix resolution

use indexmap::IndexMap;

use crate::xml::model::Element;

pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";
pub const TEI_NAMESPACE: &str = "http://www.tei-c.org/ns/1.0";

/// Ordered prefix -> namespace URI map. The empty prefix is the default namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    bindings: IndexMap<String, String>,
}

impl NamespaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings declared on the document root.
    ///
    /// A default namespace appears under the empty prefix only if the root
    /// declares one.
    pub fn from_root(root: &Element) -> Self {
        root.declared.clone()
    }

    /// Copy of this map with the default namespace rebound to `alias`, so
    /// path expressions can address it as `alias:name`.
    ///
    /// An existing binding for `alias` is kept.
    pub fn for_queries(&self, alias: &str) -> Self {
        let mut bindings: IndexMap<String, String> = self
            .bindings
            .iter()
            .filter(|(prefix, _)| !prefix.is_empty())
            .map(|(prefix, uri)| (prefix.clone(), uri.clone()))
            .collect();
        if let Some(default) = self.default_namespace() {
            if !alias.is_empty() {
                bindings
                    .entry(alias.to_string())
                    .or_insert_with(|| default.to_string());
            }
        }
        bindings
            .entry("xml".to_string())
            .or_insert_with(|| XML_NAMESPACE.to_string());
        Self { bindings }
    }

    pub fn insert(&mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Option<String> {
        self.bindings.insert(prefix.into(), uri.into())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.insert(prefix, uri);
        self
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.get("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[derive(Debug)]
struct Binding {
    prefix: String,
    uri: String,
    depth: u16,
}

/// Stack-based prefix resolver used while parsing
#[derive(Debug)]
pub(crate) struct Resolver {
    bindings: Vec<Binding>,
    depth: u16,
}

impl Resolver {
    pub(crate) fn new() -> Self {
        Self {
            bindings: vec![
                Binding {
                    prefix: "xml".to_string(),
                    uri: XML_NAMESPACE.to_string(),
                    depth: 0,
                },
                Binding {
                    prefix: "xmlns".to_string(),
                    uri: XMLNS_NAMESPACE.to_string(),
                    depth: 0,
                },
            ],
            depth: 0,
        }
    }

    pub(crate) fn push_scope(&mut self) {
        self.depth = self.depth.saturating_add(1);
    }

    /// Leave an element scope, dropping the bindings declared in it
    pub(crate) fn pop_scope(&mut self) {
        while let Some(binding) = self.bindings.last() {
            if binding.depth < self.depth {
                break;
            }
            self.bindings.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }

    /// Declare a binding in the current scope. `xml` and `xmlns` are fixed.
    pub(crate) fn declare(&mut self, prefix: &str, uri: &str) {
        if prefix == "xml" || prefix == "xmlns" {
            return;
        }
        self.bindings.push(Binding {
            prefix: prefix.to_string(),
            uri: uri.to_string(),
            depth: self.depth,
        });
    }

    /// Resolve a prefix; the empty prefix resolves the default namespace.
    /// An undeclared default (or `xmlns=""`) resolves to no namespace.
    pub(crate) fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|binding| binding.prefix == prefix)
            .map(|binding| binding.uri.as_str())
            .filter(|uri| !uri.is_empty())
    }
}
