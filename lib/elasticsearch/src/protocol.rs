//! Wire-level request bodies and response decoding for the store's REST API.

use graphsync_api::{DispatchError, Document, UpsertOutcome};
use serde::Deserialize;
use serde_json::{json, Value};

/// The store's answer to a single document write.
#[derive(Debug, Deserialize)]
pub(crate) struct IndexResponse {
    pub result: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorCause,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorCause {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkResponse {
    #[serde(default)]
    pub errors: bool,
    pub items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkItem {
    pub index: BulkItemStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkItemStatus {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorCause>,
}

pub(crate) fn outcome_from(result: &str) -> UpsertOutcome {
    match result {
        "created" => UpsertOutcome::Created,
        "noop" => UpsertOutcome::Noop,
        _ => UpsertOutcome::Updated,
    }
}

impl From<ErrorCause> for DispatchError {
    fn from(cause: ErrorCause) -> Self {
        DispatchError::Rejected {
            kind: cause.kind,
            reason: cause.reason.unwrap_or_default(),
        }
    }
}

/// Renders the NDJSON payload of a bulk request: an action line followed by
/// the document source, per document.
pub(crate) fn bulk_payload(index: &str, documents: &[(String, Document)]) -> String {
    let mut payload = String::new();
    for (id, body) in documents {
        let action = json!({"index": {"_index": index, "_id": id}});
        payload.push_str(&action.to_string());
        payload.push('\n');
        payload.push_str(&Value::Object(body.clone()).to_string());
        payload.push('\n');
    }
    payload
}

/// Decodes a bulk response into one independent result per request document.
pub(crate) fn bulk_results(
    response: BulkResponse,
) -> Vec<Result<UpsertOutcome, DispatchError>> {
    response
        .items
        .into_iter()
        .map(|item| {
            let status = item.index;
            match status.error {
                Some(cause) => Err(cause.into()),
                None => Ok(outcome_from(status.result.as_deref().unwrap_or("updated"))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, &str)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), Value::String((*v).to_string())))
            .collect()
    }

    #[test]
    fn bulk_payload_interleaves_actions_and_sources() {
        let documents = vec![
            ("doc1".to_owned(), doc(&[("firstName", "John")])),
            ("doc2".to_owned(), doc(&[("firstName", "Jane")])),
        ];

        let payload = bulk_payload("person", &documents);
        let lines: Vec<&str> = payload.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            serde_json::from_str::<Value>(lines[0]).unwrap(),
            json!({"index": {"_index": "person", "_id": "doc1"}})
        );
        assert_eq!(
            serde_json::from_str::<Value>(lines[1]).unwrap(),
            json!({"firstName": "John"})
        );
        assert_eq!(
            serde_json::from_str::<Value>(lines[2]).unwrap(),
            json!({"index": {"_index": "person", "_id": "doc2"}})
        );
        assert!(payload.ends_with('\n'));
    }

    #[test]
    fn outcome_mapping() {
        assert_eq!(outcome_from("created"), UpsertOutcome::Created);
        assert_eq!(outcome_from("updated"), UpsertOutcome::Updated);
        assert_eq!(outcome_from("noop"), UpsertOutcome::Noop);
    }

    #[test]
    fn bulk_results_report_each_document_independently() {
        // Three documents, the second rejected by the store.
        let response: BulkResponse = serde_json::from_value(json!({
            "errors": true,
            "items": [
                {"index": {"_id": "doc1", "status": 201, "result": "created"}},
                {"index": {"_id": "doc2", "status": 400, "error": {
                    "type": "mapper_parsing_exception",
                    "reason": "failed to parse field"
                }}},
                {"index": {"_id": "doc3", "status": 200, "result": "updated"}}
            ]
        }))
        .unwrap();

        let results = bulk_results(response);

        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Ok(UpsertOutcome::Created)));
        assert!(matches!(
            results[1],
            Err(DispatchError::Rejected { ref kind, .. }) if kind == "mapper_parsing_exception"
        ));
        assert!(matches!(results[2], Ok(UpsertOutcome::Updated)));
    }

    #[test]
    fn single_write_response_decodes() {
        let response: IndexResponse =
            serde_json::from_value(json!({"_id": "doc1", "result": "created"})).unwrap();
        assert_eq!(outcome_from(&response.result), UpsertOutcome::Created);
    }
}
