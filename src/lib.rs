//! teigraph: helpers for turning TEI/XML documents into RDF
//!
//! This crate provides functionality to:
//! - Parse XML documents and select elements with path expressions
//! - Derive literals, URIs, date literals and intervals from elements
//! - Build graphs with the usual vocabulary helpers
//! - Serialize graphs and stores to Turtle or TriG
//!
//! # Examples
//! ```
//! use teigraph::{build_literal, build_uri_from_tag, create_empty_graph, serialize_graph};
//! use teigraph::{Document, GraphFormat, LiteralOptions, Prefixes, Result};
//!
//! fn example() -> Result<()> {
//!     let doc = Document::parse(
//!         r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
//!              <person xml:id="DWpers0091"><persName xml:lang="fr">Olaf</persName></person>
//!            </TEI>"#,
//!     )?;
//!     let mut graph = create_empty_graph(&Prefixes::default(), None);
//!     for person in doc.select_all("//tei:person") {
//!         let subject = build_uri_from_tag(person, "http://example.com/", Some("xml:id"), None, false)?;
//!         for name in doc.select_all_from(person, "./tei:persName") {
//!             graph.add_label(subject.clone(), build_literal(name, &LiteralOptions::new()));
//!         }
//!     }
//!     let turtle = serialize_graph(&graph, GraphFormat::Turtle, None)?;
//!     assert!(turtle.contains("\"Olaf\"@fr"));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]

use std::path::Path;

use tracing::{debug, instrument};

pub mod condition;
pub mod config;
pub mod date;
pub mod error;
pub mod graph;
pub mod interval;
pub mod literal;
pub mod text;
pub mod uri;
pub mod vocab;
pub mod xml;

// Re-exports
pub use condition::matches_condition;
pub use config::{Config, Prefixes, DEFAULT_MAX_DEPTH, DEFAULT_NAMESPACE_ALIAS};
pub use date::{classify, date_to_literal, DateKind};
pub use error::{Error, ErrorKind, Pos, Result, Span};
pub use graph::{create_empty_graph, serialize_graph, GraphFormat, RdfGraph, Store};
pub use interval::{extract_interval, Interval};
pub use literal::{build_literal, build_literal_strict, build_point_literal, LiteralOptions};
pub use text::normalize_string;
pub use uri::{build_uri_from_sequence, build_uri_from_tag, ComponentKind, SequenceComponent};
pub use xml::{select_all, select_one, Document, Element, NamespaceMap, XPath};

/// Read and parse an XML file with the default configuration
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document> {
    debug!("Starting to parse file");
    let doc = Document::parse_file(path, &Config::default())?;
    debug!(namespaces = doc.namespaces.len(), "Parsing completed");
    Ok(doc)
}
