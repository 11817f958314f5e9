//! JSON rendering of edge batches for trace output.

use graphsync_model::{Subject, Term, Triple};
use serde_json::{json, Value};

fn label(term: &Term) -> &str {
    match term {
        Term::NamedNode(node) => node.as_str(),
        Term::BlankNode(node) => node.as_str(),
        Term::Literal(literal) => literal.value(),
    }
}

fn subject_label(subject: &Subject) -> &str {
    match subject {
        Subject::NamedNode(node) => node.as_str(),
        Subject::BlankNode(node) => node.as_str(),
    }
}

pub fn edge_to_json(edge: &Triple) -> Value {
    json!({
        "subject": subject_label(&edge.subject),
        "predicate": edge.predicate.as_str(),
        "object": label(&edge.object),
    })
}

pub fn edges_to_json(edges: &[Triple]) -> Value {
    Value::Array(edges.iter().map(edge_to_json).collect())
}

/// The whole batch as one JSON object, keyed `delete`/`insert`.
pub fn batch_to_json(deleted: &[Triple], added: &[Triple]) -> Value {
    json!({
        "delete": edges_to_json(deleted),
        "insert": edges_to_json(added),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphsync_model::{Literal, NamedNode};

    #[test]
    fn batch_renders_both_directions() {
        let edge = Triple::new(
            NamedNode::new("http://example.com/s").unwrap(),
            NamedNode::new("http://example.com/p").unwrap(),
            Term::Literal(Literal::new_simple_literal("o")),
        );

        let rendered = batch_to_json(&[edge.clone()], &[edge]);

        assert_eq!(
            rendered,
            json!({
                "delete": [{"subject": "http://example.com/s", "predicate": "http://example.com/p", "object": "o"}],
                "insert": [{"subject": "http://example.com/s", "predicate": "http://example.com/p", "object": "o"}],
            })
        );
    }
}
