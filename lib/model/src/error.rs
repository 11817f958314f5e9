use thiserror::Error;

/// An error raised when the declarative schema description cannot be turned
/// into a usable indexing model.
///
/// Configuration errors are fatal for the affected class: the class stays
/// excluded from indexing until the schema description is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// The index name derived from the class label is rejected by the
    /// document store.
    #[error("derived index name {0:?} is not a legal index name")]
    IllegalIndexName(String),
}
