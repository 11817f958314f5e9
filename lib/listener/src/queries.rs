//! Queries driving change classification.

use graphsync_model::vocab::im;
use std::fmt::Write;

fn im_prefix_header() -> String {
    format!("PREFIX im: <{}>\n", im::NS)
}

/// Which model declares `subject`, and for which class — whether the subject
/// is the model itself, one of its fields, or a subfield.
pub fn owning_class_query(subject_uri: &str) -> String {
    let mut query = im_prefix_header();
    query.push_str("SELECT DISTINCT ?class WHERE {\n");
    let _ = writeln!(
        query,
        "    {{ <{subject_uri}> a im:IndexingModel ; im:indexingModelOf ?class . }}"
    );
    let _ = writeln!(
        query,
        "    UNION {{ ?model a im:IndexingModel ; im:indexingModelOf ?class ; im:field <{subject_uri}> . }}"
    );
    let _ = writeln!(
        query,
        "    UNION {{ ?model a im:IndexingModel ; im:indexingModelOf ?class ; im:field ?field . ?field im:subfield <{subject_uri}> . }}"
    );
    query.push_str("}\n");
    query
}

/// Does `instance_uri` have a type for which an indexing model is declared?
///
/// Both the instance's type and the model declaration may live in the default
/// graph or in a named graph.
pub fn model_membership_query(instance_uri: &str) -> String {
    let mut query = im_prefix_header();
    query.push_str("SELECT DISTINCT ?class WHERE {\n");
    let _ = writeln!(
        query,
        "    {{ <{instance_uri}> a ?class . }} UNION {{ GRAPH ?dataGraph {{ <{instance_uri}> a ?class . }} }}"
    );
    query.push_str(
        "    { ?model a im:IndexingModel ; im:indexingModelOf ?class . } UNION { GRAPH ?modelGraph { ?model a im:IndexingModel ; im:indexingModelOf ?class . } }\n",
    );
    query.push_str("}\n");
    query
}
