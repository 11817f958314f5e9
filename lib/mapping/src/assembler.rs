use crate::DependencyTracker;
use graphsync_api::{Document, QuerySolutions};
use graphsync_model::{IndexingField, IndexingModel, NamedOrBlankNode, Term};
use serde_json::Value;
use sparesults::QuerySolution;

/// Assembles the JSON document of one instance from the description-query
/// result rows.
///
/// The rows are the cross-product of all multivalued matches; this collapses
/// them back into correct multiplicity: scalar fields take the first row,
/// multivalued fields deduplicate with set semantics, and subfield tuples
/// deduplicate by structural equality. A field with no binding is omitted
/// entirely — the document never contains `null`.
///
/// As a side effect, every IRI or blank node bound to a field or subfield is
/// recorded in the `tracker` as a dependency of the documented instance, and
/// this happens before deduplication so that every underlying binding is seen.
pub fn build_document(
    model: &IndexingModel,
    rows: &QuerySolutions,
    tracker: &DependencyTracker,
) -> Document {
    document_from_fields(model.fields(), rows, tracker)
}

fn document_from_fields<'a>(
    fields: impl Iterator<Item = &'a IndexingField>,
    rows: &QuerySolutions,
    tracker: &DependencyTracker,
) -> Document {
    let mut document = Document::new();
    for field in fields {
        if field.is_multivalued() {
            let values = multivalued_values(field, rows, tracker);
            if !values.is_empty() {
                document.insert(field.label().to_owned(), Value::Array(values));
            }
        } else if let Some(value) = single_value(field, rows, tracker) {
            document.insert(field.label().to_owned(), value);
        }
    }
    document
}

/// A non-multivalued field takes the first row's binding; with subfields the
/// value is a nested object assembled over all rows, so that multivalued
/// subfields still see every match.
fn single_value(
    field: &IndexingField,
    rows: &QuerySolutions,
    tracker: &DependencyTracker,
) -> Option<Value> {
    record_bindings(field, rows, tracker);

    let first = rows.first()?;
    let term = first.get(field.label())?;

    if field.has_subfields() {
        let nested = document_from_fields(field.subfields(), rows, tracker);
        if nested.is_empty() {
            None
        } else {
            Some(Value::Object(nested))
        }
    } else {
        Some(Value::String(term_text(term).to_owned()))
    }
}

/// A multivalued field collects one entry per distinct binding (scalar set
/// semantics) or per distinct subfield tuple (structural equality).
fn multivalued_values(
    field: &IndexingField,
    rows: &QuerySolutions,
    tracker: &DependencyTracker,
) -> Vec<Value> {
    let mut values: Vec<Value> = Vec::new();
    for row in rows {
        let Some(term) = row.get(field.label()) else {
            continue;
        };
        record_binding(term, row, tracker);

        let value = if field.has_subfields() {
            let object = subfield_object(field, row, tracker);
            if object.is_empty() {
                continue;
            }
            Value::Object(object)
        } else {
            let text = term_text(term);
            if text.is_empty() {
                continue;
            }
            Value::String(text.to_owned())
        };

        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// One nested object per result row: each subfield contributes the scalar it
/// binds in that row.
fn subfield_object(
    field: &IndexingField,
    row: &QuerySolution,
    tracker: &DependencyTracker,
) -> Document {
    let mut object = Document::new();
    for subfield in field.subfields() {
        let Some(term) = row.get(subfield.label()) else {
            continue;
        };
        record_binding(term, row, tracker);
        object.insert(
            subfield.label().to_owned(),
            Value::String(term_text(term).to_owned()),
        );
    }
    object
}

/// Records a dependency edge for every row binding of `field`.
fn record_bindings(field: &IndexingField, rows: &QuerySolutions, tracker: &DependencyTracker) {
    for row in rows {
        if let Some(term) = row.get(field.label()) {
            record_binding(term, row, tracker);
        }
    }
}

/// Literals carry no identity; only IRIs and blank nodes become dependency
/// edges.
fn record_binding(value: &Term, row: &QuerySolution, tracker: &DependencyTracker) {
    let Some(instance) = row.get("instance").and_then(as_resource) else {
        return;
    };
    if let Some(sub_resource) = as_resource(value) {
        tracker.add(sub_resource, instance);
    }
}

pub(crate) fn as_resource(term: &Term) -> Option<NamedOrBlankNode> {
    match term {
        Term::NamedNode(node) => Some(NamedOrBlankNode::NamedNode(node.clone())),
        Term::BlankNode(node) => Some(NamedOrBlankNode::BlankNode(node.clone())),
        Term::Literal(_) => None,
    }
}

pub(crate) fn term_text(term: &Term) -> &str {
    match term {
        Term::NamedNode(node) => node.as_str(),
        Term::BlankNode(node) => node.as_str(),
        Term::Literal(literal) => literal.value(),
    }
}
