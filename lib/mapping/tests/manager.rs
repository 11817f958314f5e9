use async_trait::async_trait;
use graphsync_api::{QueryEngine, QueryError, QuerySolutions};
use graphsync_mapping::{DependencyTracker, MappingManager};
use graphsync_model::{Literal, NamedNode, NamedOrBlankNode, Term, Variable};
use graphsync_registry::{InstanceIndex, ModelRegistry};
use serde_json::json;
use std::sync::Arc;

const PERSON: &str = "https://schema.org/Person";
const PERSON_1: &str = "http://example.com/person#1";

fn vars(names: &[&str]) -> Vec<Variable> {
    names.iter().map(|name| Variable::new(*name).unwrap()).collect()
}

fn lit(value: &str) -> Option<Term> {
    Some(Term::Literal(Literal::new_simple_literal(value)))
}

fn iri(value: &str) -> Option<Term> {
    Some(Term::NamedNode(NamedNode::new(value).unwrap()))
}

const SCHEMA_VARS: &[&str] = &[
    "class",
    "fLabel",
    "dt",
    "path",
    "multi",
    "analyzed",
    "optional",
    "analyzer",
    "ignore",
    "filterDeleted",
    "subfield",
    "subfieldLabel",
    "subfieldDatatype",
    "subfieldPath",
    "subfieldMulti",
    "subfieldAnalyzed",
    "subfieldAnalyzer",
    "subfieldOptional",
    "subfieldIgnore",
];

/// One scalar, required, unfiltered field of the Person model.
fn schema_row(label: &str, path: &str) -> Vec<Option<Term>> {
    let mut row = vec![
        iri(PERSON),
        lit(label),
        lit("http://www.w3.org/2001/XMLSchema#string"),
        lit(path),
        lit("false"),
        lit("false"),
        lit("false"),
        None,
        None,
        lit("false"),
    ];
    row.extend(std::iter::repeat(None).take(9));
    row
}

/// Serves the schema description of a two-field Person model plus the data
/// queries for one instance of it.
struct StubEngine {
    complete: bool,
}

impl StubEngine {
    fn new() -> Self {
        Self { complete: true }
    }

    fn incomplete() -> Self {
        Self { complete: false }
    }
}

#[async_trait]
impl QueryEngine for StubEngine {
    async fn execute(&self, query: &str) -> Result<QuerySolutions, QueryError> {
        if query.contains("im:indexingModelOf ?class ; im:field ?field") {
            return Ok(QuerySolutions::from_rows(
                vars(SCHEMA_VARS),
                vec![
                    schema_row("firstName", "foaf:firstName"),
                    schema_row("lastName", "foaf:lastName"),
                ],
            ));
        }
        if query.contains("im:prefix ?pref") {
            return Ok(QuerySolutions::default());
        }
        if query.contains("FILTER(isIRI(?instance))") {
            return Ok(QuerySolutions::from_rows(
                vars(&["instance"]),
                vec![vec![iri(PERSON_1)]],
            ));
        }
        if query.contains(" a ?type ") {
            return Ok(QuerySolutions::from_rows(
                vars(&["type"]),
                vec![vec![iri(PERSON)]],
            ));
        }
        if query.contains("LIMIT 1") {
            let rows = if self.complete {
                vec![vec![iri(PERSON_1)]]
            } else {
                Vec::new()
            };
            return Ok(QuerySolutions::from_rows(vars(&["instance"]), rows));
        }
        if query.contains("?resource ?p ?subResource") {
            return Ok(QuerySolutions::from_rows(
                vars(&["subResource", "resource"]),
                vec![vec![iri("http://example.com/address#1"), iri(PERSON_1)]],
            ));
        }
        if query.contains("VALUES ?instance") {
            return Ok(QuerySolutions::from_rows(
                vars(&["instance", "firstName", "lastName"]),
                vec![vec![iri(PERSON_1), lit("John"), lit("Doe")]],
            ));
        }
        Ok(QuerySolutions::default())
    }
}

struct FailingEngine;

#[async_trait]
impl QueryEngine for FailingEngine {
    async fn execute(&self, _query: &str) -> Result<QuerySolutions, QueryError> {
        Err(QueryError::new("engine unavailable"))
    }
}

struct Services {
    manager: MappingManager,
    registry: Arc<ModelRegistry>,
    tracker: Arc<DependencyTracker>,
    instances: Arc<InstanceIndex>,
}

fn services_with(engine: Arc<dyn QueryEngine>) -> Services {
    let instances = Arc::new(InstanceIndex::new());
    let registry = Arc::new(ModelRegistry::new(Arc::clone(&engine), Arc::clone(&instances)));
    let tracker = Arc::new(DependencyTracker::new());
    let manager = MappingManager::new(
        engine,
        Arc::clone(&registry),
        Arc::clone(&instances),
        Arc::clone(&tracker),
    );
    Services {
        manager,
        registry,
        tracker,
        instances,
    }
}

fn person_1() -> NamedNode {
    NamedNode::new(PERSON_1).unwrap()
}

#[tokio::test]
async fn instance_documents_build_one_document_per_matching_model() {
    let services = services_with(Arc::new(StubEngine::new()));
    services.registry.extract_models(None).await.unwrap();

    let documents = services.manager.instance_documents(&person_1()).await;

    let person_docs = documents.get("person").unwrap();
    assert_eq!(person_docs.len(), 1);
    let (id, body) = &person_docs[0];
    assert_eq!(id, "httpexamplecomperson1");
    assert_eq!(
        serde_json::Value::Object(body.clone()),
        json!({"firstName": "John", "lastName": "Doe"})
    );
}

#[tokio::test]
async fn incomplete_instances_produce_no_document() {
    let services = services_with(Arc::new(StubEngine::incomplete()));
    services.registry.extract_models(None).await.unwrap();

    let documents = services.manager.instance_documents(&person_1()).await;

    assert!(documents.is_empty());
}

#[tokio::test]
async fn dependencies_query_results_feed_the_tracker() {
    let services = services_with(Arc::new(StubEngine::new()));
    services.registry.extract_models(None).await.unwrap();

    services.manager.instance_documents(&person_1()).await;

    let address =
        NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/address#1").unwrap());
    let person = NamedOrBlankNode::NamedNode(person_1());
    assert_eq!(services.tracker.dependents_of(&address), vec![person]);
}

#[tokio::test]
async fn documented_instances_are_recorded_in_the_index() {
    let services = services_with(Arc::new(StubEngine::new()));
    services.registry.extract_models(None).await.unwrap();

    services.manager.instance_documents(&person_1()).await;

    let person = NamedOrBlankNode::NamedNode(person_1());
    assert!(services.instances.is_instance_of(PERSON, &person));
}

#[tokio::test]
async fn model_documents_follow_the_instance_enumeration() {
    let services = services_with(Arc::new(StubEngine::new()));
    services.registry.extract_models(None).await.unwrap();

    let model = services.registry.model(PERSON).unwrap();
    let documents = services.manager.model_documents(&model).await;

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].0, "httpexamplecomperson1");
}

#[tokio::test]
async fn all_documents_group_by_index_name() {
    let services = services_with(Arc::new(StubEngine::new()));
    services.registry.extract_models(None).await.unwrap();

    let all = services.manager.all_documents().await;

    assert_eq!(all.len(), 1);
    assert_eq!(all.get("person").unwrap().len(), 1);
}

#[tokio::test]
async fn class_documents_are_none_for_unknown_classes() {
    let services = services_with(Arc::new(StubEngine::new()));
    services.registry.extract_models(None).await.unwrap();

    assert!(services
        .manager
        .class_documents("https://schema.org/Event")
        .await
        .is_none());
}

#[tokio::test]
async fn engine_failures_are_recovered_locally() {
    let services = services_with(Arc::new(FailingEngine));

    let documents = services.manager.instance_documents(&person_1()).await;

    assert!(documents.is_empty());
}
