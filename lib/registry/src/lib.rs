//! Ownership and extraction of indexing models.
//!
//! The [ModelRegistry] re-reads the schema-description graph and rebuilds the
//! [IndexingModel](graphsync_model::IndexingModel) of each described class. It
//! also seeds the [InstanceIndex] with the known instances of every class so
//! that the change classifier can test membership cheaply.

mod instances;
pub mod queries;
mod registry;

pub use instances::*;
pub use registry::*;
