use async_trait::async_trait;
use std::error::Error;
use thiserror::Error;

/// A JSON document body, keyed by field labels.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// The document store's answer to a successful upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The document did not exist before.
    Created,
    /// An existing document was replaced.
    Updated,
    /// The store reported the write as a no-op.
    Noop,
}

/// A failure to get one document into the search index.
///
/// Dispatch errors are recovered locally per document and are not retried:
/// the triggering graph write has already committed, so the miss is repaired
/// by the next change touching the same resource or by a full re-index.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DispatchError {
    /// The store accepted the request but rejected the document.
    #[error("document store rejected the document: {kind}: {reason}")]
    Rejected { kind: String, reason: String },
    /// The store could not be reached at all.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl DispatchError {
    /// Builds a transport failure from any underlying error.
    pub fn transport(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Transport(error.into())
    }
}

/// The external document-store client.
///
/// Upserts are idempotent: sending the same `(index, id, body)` twice leaves
/// the store in the same state.
#[async_trait]
pub trait SearchIndexClient: Send + Sync {
    /// Upserts one document.
    async fn upsert(
        &self,
        index: &str,
        id: &str,
        body: &Document,
    ) -> Result<UpsertOutcome, DispatchError>;

    /// Upserts a batch of documents in one round trip.
    ///
    /// The outer `Result` is a transport-level failure of the whole call; the
    /// inner results report each document independently — one rejected
    /// document does not invalidate the others' success.
    async fn bulk_upsert(
        &self,
        index: &str,
        documents: &[(String, Document)],
    ) -> Result<Vec<Result<UpsertOutcome, DispatchError>>, DispatchError>;
}
