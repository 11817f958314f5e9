use async_trait::async_trait;
use graphsync_model::Triple;

/// Receives batches of graph-edge changes.
///
/// The graph store invokes this synchronously after a write transaction
/// commits, once per commit, with the edges that were removed and added.
/// Implementations must not hold any store lock while processing: they see
/// the post-commit state through the query engine.
#[async_trait]
pub trait EdgeChangeListener: Send + Sync {
    async fn on_bulk_edge_change(&self, deleted: &[Triple], added: &[Triple]);
}
