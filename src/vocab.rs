//! Vocabulary terms used by the triple helpers

use oxrdf::NamedNodeRef;

pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NAMESPACE: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL_NAMESPACE: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

pub use oxrdf::vocab::{rdf, rdfs, xsd};

pub mod owl {
    use super::NamedNodeRef;

    pub const SAME_AS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
}

pub mod geo {
    use super::NamedNodeRef;

    /// GeoSPARQL WKT literal datatype, the usual target of point literals
    pub const WKT_LITERAL: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.opengis.net/ont/geosparql#wktLiteral");
}
