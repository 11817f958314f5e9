//! Data structures describing how instances of an RDF class are mapped to
//! search-index documents, plus the SPARQL query synthesis derived from them.
//!
//! An [IndexingModel] is extracted from a declarative description that lives in
//! the graph store itself (see the `graphsync-registry` crate). The model owns a
//! tree of [IndexingField]s; each field knows the property path that reaches its
//! values and how those values end up in the JSON document.

mod error;
mod field;
mod model;
mod naming;
pub mod vocab;

pub use error::*;
pub use field::*;
pub use model::*;
pub use naming::*;

// Re-export the oxrdf types used throughout graphsync.
pub use oxrdf::{
    BlankNode, BlankNodeRef, Literal, LiteralRef, NamedNode, NamedNodeRef,
    NamedOrBlankNode, NamedOrBlankNodeRef, Subject, SubjectRef, Term, TermRef, Triple,
    TripleRef, Variable, VariableRef,
};
