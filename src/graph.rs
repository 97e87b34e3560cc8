//! Graph construction and Turtle/TriG serialization

mod store;

pub use store::Store;

use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use oxrdf::{Graph, GraphNameRef, NamedNode, QuadRef, Subject, Term, Triple, TripleRef};
use oxttl::{TriGSerializer, TurtleSerializer};
use tracing::{debug, info, instrument};

use crate::config::Prefixes;
use crate::error::{Error, ErrorKind, Result, Span};
use crate::vocab::{owl, rdf, rdfs};

/// Output syntax of [`serialize_graph`] and [`Store::serialize`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphFormat {
    #[default]
    Turtle,
    TriG,
}

impl GraphFormat {
    /// Usual file extension
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::TriG => "trig",
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Turtle => write!(f, "turtle"),
            Self::TriG => write!(f, "trig"),
        }
    }
}

impl FromStr for GraphFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ttl" | "turtle" => Ok(Self::Turtle),
            "trig" => Ok(Self::TriG),
            other => Err(Error::with_message(
                ErrorKind::Serialization,
                Span::empty(),
                format!("unsupported graph format: {other}"),
            )),
        }
    }
}

/// A set of triples with the prefixes used to write it and an optional
/// graph name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RdfGraph {
    identifier: Option<NamedNode>,
    prefixes: Prefixes,
    triples: Graph,
}

/// Empty graph with `prefixes` bound and an optional identifier
pub fn create_empty_graph(prefixes: &Prefixes, identifier: Option<NamedNode>) -> RdfGraph {
    RdfGraph::new(prefixes.clone(), identifier)
}

impl RdfGraph {
    pub fn new(prefixes: Prefixes, identifier: Option<NamedNode>) -> Self {
        Self {
            identifier,
            prefixes,
            triples: Graph::new(),
        }
    }

    pub fn identifier(&self) -> Option<&NamedNode> {
        self.identifier.as_ref()
    }

    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    /// Name of this graph inside a dataset
    pub fn graph_name(&self) -> GraphNameRef<'_> {
        self.identifier
            .as_ref()
            .map_or(GraphNameRef::DefaultGraph, |name| name.as_ref().into())
    }

    pub fn graph(&self) -> &Graph {
        &self.triples
    }

    pub fn iter(&self) -> impl Iterator<Item = TripleRef<'_>> {
        self.triples.iter()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> bool {
        self.triples.contains(triple)
    }

    /// Insert a triple with an arbitrary predicate. Duplicates are ignored.
    pub fn add_triple(
        &mut self,
        subject: impl Into<Subject>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> &mut Self {
        let triple = Triple::new(subject, predicate, object);
        self.triples.insert(triple.as_ref());
        self
    }

    /// `subject rdf:type class`
    pub fn add_type(&mut self, subject: impl Into<Subject>, class: impl Into<Term>) -> &mut Self {
        self.add_triple(subject, rdf::TYPE, class)
    }

    /// `subject rdfs:label label`
    pub fn add_label(&mut self, subject: impl Into<Subject>, label: impl Into<Term>) -> &mut Self {
        self.add_triple(subject, rdfs::LABEL, label)
    }

    /// `subject rdf:value value`
    pub fn add_value(&mut self, subject: impl Into<Subject>, value: impl Into<Term>) -> &mut Self {
        self.add_triple(subject, rdf::VALUE, value)
    }

    /// `subject owl:sameAs other`
    pub fn add_same_as(&mut self, subject: impl Into<Subject>, other: impl Into<Term>) -> &mut Self {
        self.add_triple(subject, owl::SAME_AS, other)
    }

    /// Remove every triple, keeping prefixes and identifier
    pub fn clear(&mut self) {
        self.triples.clear();
    }
}

fn serialization_error(err: io::Error) -> Error {
    Error::with_message(ErrorKind::Serialization, Span::empty(), err.to_string())
}

fn into_text(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|err| {
        Error::with_message(ErrorKind::Serialization, Span::empty(), err.to_string())
    })
}

/// Write triples as Turtle with `prefixes` declared
pub(crate) fn write_turtle<'a>(
    prefixes: &Prefixes,
    triples: impl IntoIterator<Item = TripleRef<'a>>,
) -> Result<String> {
    let mut serializer = TurtleSerializer::new();
    for (prefix, iri) in prefixes.iter() {
        serializer = serializer.with_prefix(prefix, iri)?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for triple in triples {
        writer.serialize_triple(triple).map_err(serialization_error)?;
    }
    into_text(writer.finish().map_err(serialization_error)?)
}

/// Write quads as TriG with `prefixes` declared
pub(crate) fn write_trig<'a>(
    prefixes: &Prefixes,
    quads: impl IntoIterator<Item = QuadRef<'a>>,
) -> Result<String> {
    let mut serializer = TriGSerializer::new();
    for (prefix, iri) in prefixes.iter() {
        serializer = serializer.with_prefix(prefix, iri)?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for quad in quads {
        writer.serialize_quad(quad).map_err(serialization_error)?;
    }
    into_text(writer.finish().map_err(serialization_error)?)
}

/// Serialize `graph` and return the text, also writing it to `path` when
/// one is given.
///
/// TriG output places the triples in the graph named by the identifier, or
/// in the default graph when there is none.
#[instrument(skip(graph), fields(triples = graph.len()))]
pub fn serialize_graph(
    graph: &RdfGraph,
    format: GraphFormat,
    path: Option<&Path>,
) -> Result<String> {
    let text = match format {
        GraphFormat::Turtle => write_turtle(graph.prefixes(), graph.iter())?,
        GraphFormat::TriG => {
            let name = graph.graph_name();
            write_trig(graph.prefixes(), graph.iter().map(|triple| triple.in_graph(name)))?
        }
    };
    debug!(bytes = text.len(), "graph serialized");

    if let Some(path) = path {
        std::fs::write(path, &text)?;
        info!(path = %path.display(), "graph written");
    }
    Ok(text)
}
