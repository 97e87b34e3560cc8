use oxrdf::{Dataset, GraphNameRef, TripleRef};
use tracing::debug;

use super::{write_trig, write_turtle, GraphFormat, RdfGraph};
use crate::config::Prefixes;
use crate::error::Result;

/// In-memory dataset aggregating graphs under their identifiers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Store {
    dataset: Dataset,
    prefixes: Prefixes,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store declaring `prefixes` on serialization
    pub fn with_prefixes(prefixes: Prefixes) -> Self {
        Self {
            dataset: Dataset::new(),
            prefixes,
        }
    }

    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Number of quads across all graphs
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Copy the triples of `graph` into the graph named by its identifier,
    /// or into the default graph. Prefixes not yet bound are taken over.
    pub fn insert_graph(&mut self, graph: &RdfGraph) -> &mut Self {
        let name = graph.graph_name();
        for triple in graph.iter() {
            self.dataset.insert(triple.in_graph(name));
        }
        self.prefixes.merge(graph.prefixes());
        debug!(graph = %name, triples = graph.len(), "graph inserted into store");
        self
    }

    /// Serialize the store. TriG covers every graph, Turtle only the
    /// default graph.
    pub fn serialize(&self, format: GraphFormat) -> Result<String> {
        match format {
            GraphFormat::TriG => write_trig(&self.prefixes, self.dataset.iter()),
            GraphFormat::Turtle => write_turtle(
                &self.prefixes,
                self.dataset
                    .iter()
                    .filter(|quad| quad.graph_name.is_default_graph())
                    .map(|quad| TripleRef::new(quad.subject, quad.predicate, quad.object)),
            ),
        }
    }

    /// Whether any quad lives in the graph `name`
    pub fn contains_graph<'a>(&self, name: impl Into<GraphNameRef<'a>>) -> bool {
        let name = name.into();
        self.dataset.iter().any(|quad| quad.graph_name == name)
    }
}
