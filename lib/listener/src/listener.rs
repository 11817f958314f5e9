use crate::classifier::{data_candidates, partition_edges, schema_subjects};
use crate::edges::batch_to_json;
use crate::queries::{model_membership_query, owning_class_query};
use async_trait::async_trait;
use graphsync_api::{
    Document, EdgeChangeListener, QueryEngine, QueryError, SearchIndexClient,
};
use graphsync_mapping::{DependencyTracker, MappingManager};
use graphsync_model::{NamedOrBlankNode, Term, Triple};
use graphsync_registry::ModelRegistry;
use rustc_hash::FxHashSet;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, error};

/// Classifies committed edge-change batches and drives the incremental
/// re-sync: schema edges refresh the affected models, data edges rebuild the
/// affected documents, and the dependency cascade pulls in every document
/// embedding a changed sub-resource.
///
/// Batches are processed in commit order; the listener holds no graph-store
/// lock and sees the post-commit state through the injected engine. Failures
/// never abort a batch — each class and instance recovers independently.
pub struct SyncListener {
    engine: Arc<dyn QueryEngine>,
    registry: Arc<ModelRegistry>,
    mappings: Arc<MappingManager>,
    tracker: Arc<DependencyTracker>,
    client: Arc<dyn SearchIndexClient>,
}

impl SyncListener {
    pub fn new(
        engine: Arc<dyn QueryEngine>,
        registry: Arc<ModelRegistry>,
        mappings: Arc<MappingManager>,
        tracker: Arc<DependencyTracker>,
        client: Arc<dyn SearchIndexClient>,
    ) -> Self {
        Self {
            engine,
            registry,
            mappings,
            tracker,
            client,
        }
    }

    /// Operator-triggered recovery: re-extracts every model, rebuilds all
    /// documents and bulk-dispatches them per index. Returns the number of
    /// documents handed to the store.
    pub async fn full_reindex(&self) -> Result<usize, QueryError> {
        self.registry.extract_models(None).await?;
        let documents = self.mappings.all_documents().await;
        let count = documents.values().map(Vec::len).sum();
        self.dispatch(documents).await;
        Ok(count)
    }

    /// Resolves the schema-edge subjects to their owning classes and
    /// re-extracts each affected model.
    async fn refresh_changed_models(&self, schema_edges: &[&Triple]) {
        if schema_edges.is_empty() {
            return;
        }

        let mut classes: BTreeSet<String> = BTreeSet::new();
        for subject in schema_subjects(schema_edges) {
            let NamedOrBlankNode::NamedNode(subject) = subject else {
                debug!("skipping blank schema subject {subject}");
                continue;
            };
            let query = owning_class_query(subject.as_str());
            match self.engine.execute(&query).await {
                Ok(rows) => {
                    for row in &rows {
                        if let Some(Term::NamedNode(class)) = row.get("class") {
                            classes.insert(class.as_str().to_owned());
                        }
                    }
                }
                Err(error) => {
                    error!("could not resolve the model declaring {subject}: {error}");
                }
            }
        }

        for class_uri in classes {
            debug!("refreshing model of class {class_uri}");
            if let Err(error) = self.registry.extract_models(Some(&class_uri)).await {
                error!("model refresh failed for class {class_uri}: {error}");
            }
        }
    }

    /// Computes the set of resources whose documents must be rebuilt: the
    /// touched instances that belong to a modeled class, expanded through the
    /// dependency tracker with a visited set so that cyclic dependencies
    /// terminate.
    async fn rebuild_set(&self, data_edges: &[&Triple]) -> Vec<NamedOrBlankNode> {
        let candidates = data_candidates(data_edges);
        let mut rebuild: Vec<NamedOrBlankNode> = Vec::new();
        let mut members: FxHashSet<NamedOrBlankNode> = FxHashSet::default();
        let mut queue: VecDeque<NamedOrBlankNode> = VecDeque::new();

        for candidate in candidates {
            // Dependents cascade from every touched resource, whether or not
            // the resource itself is a model instance.
            queue.push_back(candidate.clone());

            let NamedOrBlankNode::NamedNode(node) = &candidate else {
                continue;
            };
            let query = model_membership_query(node.as_str());
            match self.engine.execute(&query).await {
                Ok(rows) if !rows.is_empty() => {
                    if members.insert(candidate.clone()) {
                        rebuild.push(candidate);
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    error!("membership check failed for {node}: {error}");
                }
            }
        }

        let mut visited: FxHashSet<NamedOrBlankNode> = FxHashSet::default();
        while let Some(resource) = queue.pop_front() {
            if !visited.insert(resource.clone()) {
                continue;
            }
            for dependent in self.tracker.dependents_of(&resource) {
                if members.insert(dependent.clone()) {
                    rebuild.push(dependent.clone());
                }
                queue.push_back(dependent);
            }
        }

        rebuild
    }

    /// Rebuilds every document of the rebuild set and groups them per index.
    async fn rebuild_documents(&self, rebuild: Vec<NamedOrBlankNode>) {
        let mut per_index: HashMap<String, Vec<(String, Document)>> = HashMap::new();
        for resource in rebuild {
            let NamedOrBlankNode::NamedNode(instance) = resource else {
                debug!("skipping blank rebuild candidate {resource}");
                continue;
            };
            for (index, documents) in self.mappings.instance_documents(&instance).await {
                per_index.entry(index).or_default().extend(documents);
            }
        }
        self.dispatch(per_index).await;
    }

    /// One bulk call per index; a single document goes through the single
    /// upsert path. Per-document failures are logged and dropped.
    async fn dispatch(&self, per_index: HashMap<String, Vec<(String, Document)>>) {
        for (index, documents) in per_index {
            if let [(id, body)] = documents.as_slice() {
                match self.client.upsert(&index, id, body).await {
                    Ok(outcome) => {
                        debug!("document {id} sent to index {index}: {outcome:?}");
                    }
                    Err(error) => {
                        error!("failed to send document {id} to index {index}: {error}");
                    }
                }
                continue;
            }

            match self.client.bulk_upsert(&index, &documents).await {
                Ok(results) => {
                    for ((id, _), result) in documents.iter().zip(results) {
                        match result {
                            Ok(outcome) => {
                                debug!("document {id} sent to index {index}: {outcome:?}");
                            }
                            Err(error) => {
                                error!("index {index} rejected document {id}: {error}");
                            }
                        }
                    }
                }
                Err(error) => {
                    error!("bulk dispatch to index {index} failed: {error}");
                }
            }
        }
    }
}

#[async_trait]
impl EdgeChangeListener for SyncListener {
    async fn on_bulk_edge_change(&self, deleted: &[Triple], added: &[Triple]) {
        if !self.registry.has_models() {
            return;
        }
        if deleted.is_empty() && added.is_empty() {
            debug!("bulk edge change with no edge to delete or add");
            return;
        }
        debug!("processing edge-change batch {}", batch_to_json(deleted, added));

        let partition = partition_edges(deleted, added);
        self.refresh_changed_models(&partition.schema).await;

        let rebuild = self.rebuild_set(&partition.data).await;
        if rebuild.is_empty() {
            debug!("no documents affected by this batch");
            return;
        }
        self.rebuild_documents(rebuild).await;
    }
}
