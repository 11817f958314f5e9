//! graphsync keeps a document search index synchronized with an RDF graph
//! store, driven by a declarative, graph-encoded indexing-model schema.
//!
//! [GraphSync] wires the services together around two injected collaborators:
//! the graph query engine and the document-store client. The returned
//! listener is registered with the graph store's change-notification
//! mechanism; everything else (model extraction, mapping dumps, full
//! re-index) is exposed for maintenance surfaces.

use graphsync_api::{QueryEngine, QueryError, SearchIndexClient};
use graphsync_listener::SyncListener;
use graphsync_mapping::{DependencyTracker, MappingManager};
use graphsync_registry::{InstanceIndex, ModelRegistry};
use std::sync::Arc;

pub use graphsync_api as api;
pub use graphsync_elasticsearch as elasticsearch;
pub use graphsync_listener as listener;
pub use graphsync_mapping as mapping;
pub use graphsync_model as model;
pub use graphsync_registry as registry;

/// The assembled synchronization services.
///
/// All shared state (models, instance index, dependency adjacency) lives in
/// explicitly constructed services with interior synchronization — there are
/// no process-wide singletons, so independent instances can coexist.
pub struct GraphSync {
    registry: Arc<ModelRegistry>,
    instances: Arc<InstanceIndex>,
    tracker: Arc<DependencyTracker>,
    mappings: Arc<MappingManager>,
    listener: Arc<SyncListener>,
}

impl GraphSync {
    pub fn new(engine: Arc<dyn QueryEngine>, client: Arc<dyn SearchIndexClient>) -> Self {
        let instances = Arc::new(InstanceIndex::new());
        let registry = Arc::new(ModelRegistry::new(
            Arc::clone(&engine),
            Arc::clone(&instances),
        ));
        let tracker = Arc::new(DependencyTracker::new());
        let mappings = Arc::new(MappingManager::new(
            Arc::clone(&engine),
            Arc::clone(&registry),
            Arc::clone(&instances),
            Arc::clone(&tracker),
        ));
        let listener = Arc::new(SyncListener::new(
            engine,
            Arc::clone(&registry),
            Arc::clone(&mappings),
            Arc::clone(&tracker),
            client,
        ));
        Self {
            registry,
            instances,
            tracker,
            mappings,
            listener,
        }
    }

    /// The listener to register with the graph store's change notifications.
    pub fn listener(&self) -> &Arc<SyncListener> {
        &self.listener
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn mappings(&self) -> &Arc<MappingManager> {
        &self.mappings
    }

    pub fn instances(&self) -> &Arc<InstanceIndex> {
        &self.instances
    }

    pub fn dependency_tracker(&self) -> &Arc<DependencyTracker> {
        &self.tracker
    }

    /// Extracts every model and pushes all documents to the store.
    pub async fn full_reindex(&self) -> Result<usize, QueryError> {
        self.listener.full_reindex().await
    }
}
