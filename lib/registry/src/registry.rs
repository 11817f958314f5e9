use crate::queries::{prefix_query, schema_extraction_query};
use crate::InstanceIndex;
use dashmap::DashMap;
use graphsync_api::{QueryEngine, QueryError};
use graphsync_model::{IndexingField, IndexingModel, NamedOrBlankNode, Term};
use rustc_hash::FxHashSet;
use sparesults::QuerySolution;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Owns the class -> [IndexingModel] map and extracts it from the schema
/// description graph.
///
/// The registry is an explicitly constructed, injected service with interior
/// synchronization; callers only see cloned model snapshots and never reach
/// the internal map.
pub struct ModelRegistry {
    engine: Arc<dyn QueryEngine>,
    instances: Arc<InstanceIndex>,
    models: DashMap<String, IndexingModel>,
}

impl ModelRegistry {
    pub fn new(engine: Arc<dyn QueryEngine>, instances: Arc<InstanceIndex>) -> Self {
        Self {
            engine,
            instances,
            models: DashMap::new(),
        }
    }

    /// Returns a snapshot of the model registered for `class_uri`.
    pub fn model(&self, class_uri: &str) -> Option<IndexingModel> {
        self.models.get(class_uri).map(|entry| entry.value().clone())
    }

    /// Returns a snapshot of every registered model.
    pub fn models(&self) -> Vec<IndexingModel> {
        self.models.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn has_models(&self) -> bool {
        !self.models.is_empty()
    }

    pub fn clear(&self) {
        self.models.clear();
    }

    /// Re-reads the schema description and rebuilds the model of `target`, or
    /// of every described class when no target is given.
    ///
    /// Extraction is idempotent: without schema changes, running it twice
    /// yields identical models. A failing schema query leaves the registry at
    /// its last-known state and is reported to the caller; per-class prefix
    /// and enumeration failures are logged and recovered locally. A class
    /// whose derived index name is illegal is excluded from the registry
    /// until its description is fixed.
    pub async fn extract_models(&self, target: Option<&str>) -> Result<(), QueryError> {
        let query = schema_extraction_query(target);
        let rows = match self.engine.execute(&query).await {
            Ok(rows) => rows,
            Err(error) => {
                error!("schema extraction query failed: {error}\n{query}");
                return Err(error.with_query(query));
            }
        };

        let mut drafts: BTreeMap<String, IndexingModel> = BTreeMap::new();
        let mut rejected: FxHashSet<String> = FxHashSet::default();

        for row in &rows {
            let Some(class_uri) = opt_text(row, "class") else {
                continue;
            };
            if rejected.contains(class_uri) {
                continue;
            }
            let model = match drafts.entry(class_uri.to_owned()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => match IndexingModel::new(class_uri) {
                    Ok(model) => entry.insert(model),
                    Err(error) => {
                        error!("class {class_uri} excluded from indexing: {error}");
                        rejected.insert(class_uri.to_owned());
                        continue;
                    }
                },
            };
            apply_field_row(model, row);
        }

        for model in drafts.values_mut() {
            self.extract_prefixes(model).await;
        }

        let affected: Vec<String> = drafts.keys().cloned().collect();
        match target {
            Some(class_uri) => {
                if let Some(model) = drafts.remove(class_uri) {
                    debug!("extracted model for class {class_uri}");
                    self.models.insert(class_uri.to_owned(), model);
                } else {
                    // The description no longer defines a usable model for
                    // this class.
                    self.models.remove(class_uri);
                }
            }
            None => {
                self.models.clear();
                for (class_uri, model) in drafts {
                    self.models.insert(class_uri, model);
                }
            }
        }

        for class_uri in &affected {
            self.seed_instances(class_uri).await;
        }

        Ok(())
    }

    async fn extract_prefixes(&self, model: &mut IndexingModel) {
        let query = prefix_query(model.class_uri());
        match self.engine.execute(&query).await {
            Ok(rows) => {
                for row in &rows {
                    if let (Some(prefix), Some(namespace)) =
                        (opt_text(row, "prefix"), opt_text(row, "namespace"))
                    {
                        model.add_prefix(prefix, namespace);
                    }
                }
            }
            Err(error) => {
                warn!(
                    "prefix extraction failed for class {}: {error}",
                    model.class_uri()
                );
            }
        }
    }

    /// Seeds the instance index with the class's enumerated instances.
    async fn seed_instances(&self, class_uri: &str) {
        let Some(model) = self.model(class_uri) else {
            return;
        };
        let query = model.instance_enumeration_query();
        match self.engine.execute(&query).await {
            Ok(rows) => {
                for row in &rows {
                    if let Some(Term::NamedNode(instance)) = row.get("instance") {
                        self.instances
                            .record(class_uri, NamedOrBlankNode::NamedNode(instance.clone()));
                    }
                }
            }
            Err(error) => {
                warn!("instance enumeration failed for class {class_uri}: {error}");
            }
        }
    }
}

/// Merges one extraction row into the draft model.
///
/// The first row for a (class, field) pair creates the field; later rows only
/// set additional attributes, so a bound column is never overwritten by an
/// absent one.
fn apply_field_row(model: &mut IndexingModel, row: &QuerySolution) {
    let (Some(label), Some(datatype), Some(path)) = (
        opt_text(row, "fLabel"),
        opt_text(row, "dt"),
        opt_text(row, "path"),
    ) else {
        warn!(
            "incomplete field description for class {}",
            model.class_uri()
        );
        return;
    };

    if model.field(label).is_none() {
        model.add_field(IndexingField::new(label, datatype, path));
    }
    let Some(field) = model.field_mut(label) else {
        return;
    };

    if let Some(value) = opt_bool(row, "multi") {
        field.set_multivalued(value);
    }
    if let Some(value) = opt_bool(row, "analyzed") {
        field.set_analyzed(value);
    }
    if let Some(value) = opt_bool(row, "optional") {
        field.set_optional(value);
    }
    if let Some(value) = opt_text(row, "analyzer") {
        field.set_analyzer(value);
    }
    if let Some(value) = opt_u32(row, "ignore") {
        field.set_ignore_above(value);
    }
    if let Some(value) = opt_bool(row, "filterDeleted") {
        field.set_filter_deleted(value);
    }

    if row.get("subfield").is_some() {
        apply_subfield_row(field, row);
    }
}

fn apply_subfield_row(field: &mut IndexingField, row: &QuerySolution) {
    let (Some(label), Some(datatype), Some(path)) = (
        opt_text(row, "subfieldLabel"),
        opt_text(row, "subfieldDatatype"),
        opt_text(row, "subfieldPath"),
    ) else {
        warn!("incomplete subfield description for field {}", field.label());
        return;
    };

    if field.subfield(label).is_none() {
        field.add_subfield(IndexingField::new(label, datatype, path));
    }
    let Some(subfield) = field.subfield_mut(label) else {
        return;
    };

    if let Some(value) = opt_bool(row, "subfieldMulti") {
        subfield.set_multivalued(value);
    }
    if let Some(value) = opt_bool(row, "subfieldAnalyzed") {
        subfield.set_analyzed(value);
    }
    if let Some(value) = opt_bool(row, "subfieldOptional") {
        subfield.set_optional(value);
    }
    if let Some(value) = opt_text(row, "subfieldAnalyzer") {
        subfield.set_analyzer(value);
    }
    if let Some(value) = opt_u32(row, "subfieldIgnore") {
        subfield.set_ignore_above(value);
    }
}

fn term_text(term: &Term) -> &str {
    match term {
        Term::NamedNode(node) => node.as_str(),
        Term::BlankNode(node) => node.as_str(),
        Term::Literal(literal) => literal.value(),
    }
}

fn opt_text<'a>(row: &'a QuerySolution, variable: &str) -> Option<&'a str> {
    row.get(variable).map(term_text)
}

/// Boolean attribute columns are literal strings in the description graph.
fn opt_bool(row: &QuerySolution, variable: &str) -> Option<bool> {
    opt_text(row, variable).map(|value| value == "true")
}

fn opt_u32(row: &QuerySolution, variable: &str) -> Option<u32> {
    opt_text(row, variable).and_then(|value| value.parse().ok())
}
