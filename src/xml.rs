//! XML accessor: parsing, namespace maps and path selection

pub mod cursor;
pub mod model;
pub mod namespace;
pub mod parser;
pub mod path;
pub mod select;

use std::path::Path;

use tracing::{debug, instrument, warn};

pub use model::{Attribute, Content, Document, Element, QName};
pub use namespace::{NamespaceMap, TEI_NAMESPACE, XML_NAMESPACE};
pub use parser::Parser;
pub use path::XPath;

use crate::config::Config;
use crate::error::Result;

/// Attribute name of TEI identifiers
pub const XML_ID: &str = "xml:id";
/// Attribute name of language declarations
pub const XML_LANG: &str = "xml:lang";

/// Compile `path`, logging and swallowing compile errors
fn compile_lenient(path: &str, namespaces: &NamespaceMap) -> Option<XPath> {
    match XPath::compile(path, namespaces) {
        Ok(compiled) => Some(compiled),
        Err(err) => {
            warn!(path, error = %err, "path expression selects nothing");
            None
        }
    }
}

/// All elements matching `path` from `context`, in document order.
///
/// Never fails: an invalid or non-matching path yields an empty list.
pub fn select_all<'a>(
    context: &'a Element,
    path: &str,
    namespaces: &NamespaceMap,
) -> Vec<&'a Element> {
    compile_lenient(path, namespaces)
        .map(|compiled| compiled.select_all(context))
        .unwrap_or_default()
}

/// First element matching `path` from `context`
pub fn select_one<'a>(
    context: &'a Element,
    path: &str,
    namespaces: &NamespaceMap,
) -> Option<&'a Element> {
    compile_lenient(path, namespaces).and_then(|compiled| compiled.select_one(context))
}

impl Document {
    /// Parse a document from text with the default configuration
    pub fn parse(source: &str) -> Result<Self> {
        Parser::new(source.as_bytes()).parse()
    }

    /// Parse a document from bytes with custom configuration
    pub fn parse_with_config(source: &[u8], config: &Config) -> Result<Self> {
        Parser::with_config(source, config).parse()
    }

    /// Read and parse a document from disk
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn parse_file(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        debug!(bytes = bytes.len(), "file read, parsing");
        let doc = Self::parse_with_config(&bytes, config)?;
        debug!(root = %doc.root.name, "document parsed");
        Ok(doc)
    }

    /// Evaluate `path` against this document using the aliased namespace
    /// map. Absolute paths start at the document node, relative ones at
    /// the root element.
    pub fn select_all(&self, path: &str) -> Vec<&Element> {
        compile_lenient(path, &self.query_namespaces)
            .map(|compiled| {
                if compiled.is_absolute() {
                    compiled.select_from_root(&self.root)
                } else {
                    compiled.select_all(&self.root)
                }
            })
            .unwrap_or_default()
    }

    pub fn select_one(&self, path: &str) -> Option<&Element> {
        self.select_all(path).into_iter().next()
    }

    /// Evaluate `path` from `context` with this document's namespace map
    pub fn select_all_from<'a>(&'a self, context: &'a Element, path: &str) -> Vec<&'a Element> {
        select_all(context, path, &self.query_namespaces)
    }

    pub fn select_one_from<'a>(&'a self, context: &'a Element, path: &str) -> Option<&'a Element> {
        select_one(context, path, &self.query_namespaces)
    }
}
