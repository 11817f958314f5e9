use crate::{as_resource, build_document, DependencyTracker};
use graphsync_api::{Document, QueryEngine};
use graphsync_model::{document_id, IndexingModel, NamedNode, NamedOrBlankNode, Term};
use graphsync_registry::{InstanceIndex, ModelRegistry};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, error};

/// Produces the search-index documents of model instances.
///
/// One document per (instance, model) pair: an instance whose types match
/// several models yields one document per model, each targeted at that
/// model's index. Query failures are recovered per instance — a failed
/// rebuild is logged and skipped, never aborting the surrounding batch.
pub struct MappingManager {
    engine: Arc<dyn QueryEngine>,
    registry: Arc<ModelRegistry>,
    instances: Arc<InstanceIndex>,
    tracker: Arc<DependencyTracker>,
}

impl MappingManager {
    pub fn new(
        engine: Arc<dyn QueryEngine>,
        registry: Arc<ModelRegistry>,
        instances: Arc<InstanceIndex>,
        tracker: Arc<DependencyTracker>,
    ) -> Self {
        Self {
            engine,
            registry,
            instances,
            tracker,
        }
    }

    /// Rebuilds the documents of one instance for every model matching its
    /// declared types, grouped by target index.
    pub async fn instance_documents(
        &self,
        instance: &NamedNode,
    ) -> HashMap<String, Vec<(String, Document)>> {
        debug!("retrieving documents for instance {instance}");
        let mut documents: HashMap<String, Vec<(String, Document)>> = HashMap::new();
        for model in self.models_of_instance(instance).await {
            if let Some(entry) = self.model_document(&model, instance).await {
                documents
                    .entry(model.index_name().to_owned())
                    .or_default()
                    .push(entry);
            }
        }
        documents
    }

    /// All documents of one model, produced through its instance enumeration.
    pub async fn model_documents(&self, model: &IndexingModel) -> Vec<(String, Document)> {
        let enumeration = model.instance_enumeration_query();
        let rows = match self.engine.execute(&enumeration).await {
            Ok(rows) => rows,
            Err(error) => {
                error!(
                    "instance enumeration failed for class {}: {error}",
                    model.class_uri()
                );
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for row in &rows {
            let Some(Term::NamedNode(instance)) = row.get("instance") else {
                continue;
            };
            if let Some(entry) = self.model_document(model, instance).await {
                documents.push(entry);
            }
        }
        documents
    }

    /// All documents of every registered model, grouped by target index.
    pub async fn all_documents(&self) -> HashMap<String, Vec<(String, Document)>> {
        let mut documents: HashMap<String, Vec<(String, Document)>> = HashMap::new();
        for model in self.registry.models() {
            let entries = self.model_documents(&model).await;
            documents
                .entry(model.index_name().to_owned())
                .or_default()
                .extend(entries);
        }
        documents
    }

    /// The documents of one class, or `None` when no model describes it.
    pub async fn class_documents(&self, class_uri: &str) -> Option<Vec<(String, Document)>> {
        let model = self.registry.model(class_uri)?;
        Some(self.model_documents(&model).await)
    }

    /// The models whose class matches one of the instance's declared types.
    async fn models_of_instance(&self, instance: &NamedNode) -> Vec<IndexingModel> {
        let query = instance_type_query(instance.as_str());
        let rows = match self.engine.execute(&query).await {
            Ok(rows) => rows,
            Err(error) => {
                error!("type query failed for instance {instance}: {error}");
                return Vec::new();
            }
        };

        let mut models: BTreeMap<String, IndexingModel> = BTreeMap::new();
        for row in &rows {
            if let Some(Term::NamedNode(class)) = row.get("type") {
                if let Some(model) = self.registry.model(class.as_str()) {
                    models.insert(model.class_uri().to_owned(), model);
                }
            }
        }
        models.into_values().collect()
    }

    /// One model's document for one instance.
    ///
    /// Returns `None` when the instance does not satisfy the model's required
    /// fields, or when a query fails (logged, recovered locally).
    async fn model_document(
        &self,
        model: &IndexingModel,
        instance: &NamedNode,
    ) -> Option<(String, Document)> {
        // The candidate must pass the required-field check before any
        // assembly is attempted.
        let completeness = model.completeness_query(instance.as_str());
        match self.engine.execute(&completeness).await {
            Ok(rows) if rows.is_empty() => {
                debug!(
                    "instance {instance} incomplete for class {}",
                    model.class_uri()
                );
                return None;
            }
            Ok(_) => {}
            Err(error) => {
                error!("completeness check failed for instance {instance}: {error}");
                return None;
            }
        }

        // Seed the dependency edges reachable through the model's paths.
        let dependencies = dependencies_query(model, instance.as_str());
        match self.engine.execute(&dependencies).await {
            Ok(rows) => {
                for row in &rows {
                    if let (Some(sub_resource), Some(resource)) = (
                        row.get("subResource").and_then(as_resource),
                        row.get("resource").and_then(as_resource),
                    ) {
                        self.tracker.add(sub_resource, resource);
                    }
                }
            }
            Err(error) => {
                error!("dependencies query failed for instance {instance}: {error}");
            }
        }

        let description = model.instance_description_query(instance.as_str());
        let rows = match self.engine.execute(&description).await {
            Ok(rows) => rows,
            Err(error) => {
                error!("description query failed for instance {instance} using\n{description}\n{error}");
                return None;
            }
        };

        self.instances.record(
            model.class_uri(),
            NamedOrBlankNode::NamedNode(instance.clone()),
        );
        let document = build_document(model, &rows, &self.tracker);
        Some((document_id(instance.as_str()), document))
    }
}

/// SPARQL query for the declared types of an instance.
fn instance_type_query(instance_uri: &str) -> String {
    format!("SELECT ?type WHERE {{ <{instance_uri}> a ?type . FILTER(isIRI(?type)) }}\n")
}

/// SPARQL query for the sub-resources feeding an instance's fields: every
/// IRI or blank node reachable through one of the model's property paths.
fn dependencies_query(model: &IndexingModel, instance_uri: &str) -> String {
    let mut query = model.prefix_header();
    query.push_str("SELECT DISTINCT ?subResource ?resource WHERE {\n");
    query.push_str("    ?resource ?p ?subResource .\n");
    query.push_str("    VALUES ?p {");
    for field in model.fields() {
        query.push(' ');
        query.push_str(field.path());
    }
    query.push_str(" }\n");
    let _ = writeln!(query, "    FILTER(?resource = <{instance_uri}>)");
    query.push_str("    FILTER(isIRI(?subResource) || isBlank(?subResource))\n");
    query.push_str("}\n");
    query
}
