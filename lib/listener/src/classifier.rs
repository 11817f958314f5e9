use graphsync_model::vocab::im;
use graphsync_model::{NamedOrBlankNode, Subject, Term, Triple};
use rustc_hash::FxHashSet;

/// An edge batch split into schema-description edges and application-data
/// edges.
///
/// An edge is a schema edge exactly when its predicate belongs to the closed
/// property sets of the description ontology; everything else is data. The
/// test is by predicate URI only — a field declaration reached through
/// indirection is data by contract.
#[derive(Debug, Default)]
pub struct EdgePartition<'a> {
    pub schema: Vec<&'a Triple>,
    pub data: Vec<&'a Triple>,
}

pub fn partition_edges<'a>(deleted: &'a [Triple], added: &'a [Triple]) -> EdgePartition<'a> {
    let mut partition = EdgePartition::default();
    for edge in deleted.iter().chain(added) {
        if im::is_schema_property(edge.predicate.as_str()) {
            partition.schema.push(edge);
        } else {
            partition.data.push(edge);
        }
    }
    partition
}

/// The subjects of the changed schema edges: the model, field or subfield
/// resources whose description changed.
pub fn schema_subjects(schema_edges: &[&Triple]) -> FxHashSet<NamedOrBlankNode> {
    schema_edges
        .iter()
        .map(|edge| match &edge.subject {
            Subject::NamedNode(node) => NamedOrBlankNode::NamedNode(node.clone()),
            Subject::BlankNode(node) => NamedOrBlankNode::BlankNode(node.clone()),
        })
        .collect()
}

/// The candidate instances touched by the changed data edges: every subject
/// plus every non-blank, non-literal object.
pub fn data_candidates(data_edges: &[&Triple]) -> FxHashSet<NamedOrBlankNode> {
    let mut candidates = FxHashSet::default();
    for edge in data_edges {
        match &edge.subject {
            Subject::NamedNode(node) => {
                candidates.insert(NamedOrBlankNode::NamedNode(node.clone()));
            }
            Subject::BlankNode(node) => {
                candidates.insert(NamedOrBlankNode::BlankNode(node.clone()));
            }
        }
        if let Term::NamedNode(node) = &edge.object {
            candidates.insert(NamedOrBlankNode::NamedNode(node.clone()));
        }
    }
    candidates
}
