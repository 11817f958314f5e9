//! HTTP dispatcher sending assembled documents to an Elasticsearch-compatible
//! document store.

mod client;
mod protocol;

pub use client::*;
