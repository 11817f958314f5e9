//! Turns query results into search-index documents.
//!
//! The [MappingManager] resolves which models describe an instance, runs the
//! synthesized queries through the injected engine and assembles one JSON
//! document per (instance, model) pair. Assembly also feeds the
//! [DependencyTracker]: every IRI or blank node bound to a field becomes an
//! inverse-dependency edge, so that a later change to the sub-resource
//! re-indexes the documents embedding it.

mod assembler;
mod dependencies;
mod manager;

pub use assembler::*;
pub use dependencies::*;
pub use manager::*;
