//! Caller configuration threaded through parsing and serialization

use indexmap::IndexMap;

use crate::vocab;

/// Alias the default XML namespace is bound to in path expressions
pub const DEFAULT_NAMESPACE_ALIAS: &str = "tei";

/// Deepest element nesting the parser accepts
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Prefix -> namespace IRI bindings written into serialized graphs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prefixes {
    bindings: IndexMap<String, String>,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self::empty()
            .with("rdf", vocab::RDF_NAMESPACE)
            .with("rdfs", vocab::RDFS_NAMESPACE)
            .with("owl", vocab::OWL_NAMESPACE)
            .with("xsd", vocab::XSD_NAMESPACE)
    }
}

impl Prefixes {
    /// No bindings at all
    pub fn empty() -> Self {
        Self {
            bindings: IndexMap::new(),
        }
    }

    /// Add or replace a binding
    pub fn with(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.bindings.insert(prefix.into(), iri.into());
        self
    }

    /// Take over the bindings of `other` whose prefix is not bound yet
    pub fn merge(&mut self, other: &Self) {
        for (prefix, iri) in other.iter() {
            if !self.bindings.contains_key(prefix) {
                self.bindings.insert(prefix.to_string(), iri.to_string());
            }
        }
    }

    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings.get(prefix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<P: Into<String>, I: Into<String>> FromIterator<(P, I)> for Prefixes {
    fn from_iter<T: IntoIterator<Item = (P, I)>>(iter: T) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(p, i)| (p.into(), i.into()))
                .collect(),
        }
    }
}

/// Processing configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Prefix the document's default namespace is queried under
    pub default_namespace_alias: String,
    /// Bindings for serialized graphs
    pub prefixes: Prefixes,
    /// Maximum element nesting depth
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace_alias: DEFAULT_NAMESPACE_ALIAS.to_string(),
            prefixes: Prefixes::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    pub fn new(default_namespace_alias: impl Into<String>, prefixes: Prefixes) -> Self {
        Self {
            default_namespace_alias: default_namespace_alias.into(),
            prefixes,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.default_namespace_alias = alias.into();
        self
    }

    pub fn with_prefixes(mut self, prefixes: Prefixes) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_namespace_alias, "tei");
        assert_eq!(config.prefixes.get("owl"), Some("http://www.w3.org/2002/07/owl#"));
        assert_eq!(config.prefixes.len(), 4);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_prefix_order_is_insertion_order() {
        let prefixes = Prefixes::empty()
            .with("crm", "http://www.cidoc-crm.org/cidoc-crm/")
            .with("rdf", vocab::RDF_NAMESPACE);
        let keys: Vec<&str> = prefixes.iter().map(|(p, _)| p).collect();
        assert_eq!(keys, vec!["crm", "rdf"]);
    }

    #[test]
    fn test_custom_config() {
        let config = Config::new("t", Prefixes::empty())
            .with_alias("tei2")
            .with_max_depth(16);
        assert_eq!(config.default_namespace_alias, "tei2");
        assert!(config.prefixes.is_empty());
        assert_eq!(config.max_depth, 16);
    }

    #[test]
    fn test_prefixes_from_iter() {
        let prefixes: Prefixes = [("ex", "http://example.com/")].into_iter().collect();
        assert_eq!(prefixes.get("ex"), Some("http://example.com/"));
    }

    #[test]
    fn test_merge_keeps_existing_bindings() {
        let mut prefixes = Prefixes::empty().with("ex", "http://example.com/");
        prefixes.merge(
            &Prefixes::empty()
                .with("ex", "http://example.org/")
                .with("crm", "http://www.cidoc-crm.org/cidoc-crm/"),
        );
        assert_eq!(prefixes.get("ex"), Some("http://example.com/"));
        assert_eq!(prefixes.len(), 2);
    }
}
