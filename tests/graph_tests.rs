#![allow(clippy::panic_in_result_fn)]
#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use oxrdf::{Literal, NamedNode};
use teigraph::vocab::rdf;
use teigraph::{
    create_empty_graph, serialize_graph, GraphFormat, Prefixes, RdfGraph, Result, Store,
};

fn subject() -> NamedNode {
    NamedNode::new_unchecked("http://example.com/subject")
}

fn object() -> NamedNode {
    NamedNode::new_unchecked("http://example.com/object")
}

fn identified_graph() -> RdfGraph {
    create_empty_graph(
        &Prefixes::default(),
        Some(NamedNode::new_unchecked("http://example.com/identifier")),
    )
}

#[test]
fn test_create_empty_graph() {
    let graph = identified_graph();
    assert!(graph.is_empty());
    assert_eq!(graph.identifier().map(NamedNode::as_str), Some("http://example.com/identifier"));
    assert_eq!(graph.prefixes().get("rdfs"), Some("http://www.w3.org/2000/01/rdf-schema#"));
}

#[test]
fn test_serialize_to_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("same_as.ttl");

    let mut graph = identified_graph();
    graph.add_same_as(subject(), object());
    let data = serialize_graph(&graph, GraphFormat::Turtle, Some(&path))?;

    assert!(data.contains("http://example.com/subject"));
    assert!(data.contains("http://example.com/object"));
    assert!(data.contains("owl:sameAs"));
    assert_eq!(std::fs::read_to_string(&path)?, data);
    Ok(())
}

#[test]
fn test_custom_and_type_triples() -> Result<()> {
    let mut graph = identified_graph();
    graph.add_triple(subject(), rdf::TYPE, object());
    let custom = serialize_graph(&graph, GraphFormat::Turtle, None)?;

    let mut typed = identified_graph();
    typed.add_type(subject(), object());
    assert_eq!(serialize_graph(&typed, GraphFormat::Turtle, None)?, custom);
    assert!(custom.contains("a <http://example.com/object>"), "{custom}");
    Ok(())
}

#[test]
fn test_value_and_label_triples() -> Result<()> {
    let mut graph = identified_graph();
    graph
        .add_value(subject(), object())
        .add_label(subject(), Literal::new_simple_literal("Subject"));
    let data = serialize_graph(&graph, GraphFormat::Turtle, None)?;
    assert!(data.contains("rdf:value"), "{data}");
    assert!(data.contains("rdfs:label"), "{data}");
    assert!(data.contains("\"Subject\""), "{data}");
    Ok(())
}

#[test]
fn test_store_trig_to_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let format: GraphFormat = "trig".parse()?;
    let path = dir.path().join(format!("store.{}", format.extension()));

    let mut graph = identified_graph();
    graph.add_same_as(subject(), object());
    let mut store = Store::new();
    store.insert_graph(&graph);

    let data = store.serialize(format)?;
    std::fs::write(&path, &data)?;
    assert!(data.contains("<http://example.com/identifier>"), "{data}");
    assert!(std::fs::read_to_string(&path)?.contains("owl:sameAs"));
    Ok(())
}

#[test]
fn test_unwritable_path() {
    let graph = identified_graph();
    let path = std::path::Path::new("/nonexistent/dir/graph.ttl");
    let err = serialize_graph(&graph, GraphFormat::Turtle, Some(path)).unwrap_err();
    assert_eq!(err.kind(), &teigraph::ErrorKind::Io);
}
