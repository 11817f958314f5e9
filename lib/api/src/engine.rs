use async_trait::async_trait;
use graphsync_model::{Term, Variable};
use sparesults::QuerySolution;
use std::sync::Arc;
use thiserror::Error;

/// An error reported by the query engine, or raised for a malformed
/// synthesized query.
///
/// Query errors are always recovered locally: the affected class or instance
/// is skipped for the current cycle and the failing query text is kept for
/// diagnosis.
#[derive(Debug, Clone, Error)]
#[error("query evaluation failed: {message}")]
pub struct QueryError {
    message: String,
    query: Option<String>,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            query: None,
        }
    }

    /// Attaches the failing query text for diagnosis.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

/// An ordered table of variable bindings returned by the query engine.
#[derive(Debug, Default)]
pub struct QuerySolutions {
    variables: Arc<[Variable]>,
    solutions: Vec<QuerySolution>,
}

impl QuerySolutions {
    pub fn new(variables: Arc<[Variable]>, solutions: Vec<QuerySolution>) -> Self {
        Self {
            variables,
            solutions,
        }
    }

    /// Builds a table from raw rows, one optional term per variable.
    pub fn from_rows(variables: Vec<Variable>, rows: Vec<Vec<Option<Term>>>) -> Self {
        let variables: Arc<[Variable]> = variables.into();
        let solutions = rows
            .into_iter()
            .map(|row| QuerySolution::from((Arc::clone(&variables), row)))
            .collect();
        Self {
            variables,
            solutions,
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn first(&self) -> Option<&QuerySolution> {
        self.solutions.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuerySolution> {
        self.solutions.iter()
    }
}

impl<'a> IntoIterator for &'a QuerySolutions {
    type Item = &'a QuerySolution;
    type IntoIter = std::slice::Iter<'a, QuerySolution>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

/// The external graph query engine.
///
/// Implementations evaluate a SPARQL `SELECT` query over a consistent
/// post-commit snapshot of the graph store and return the solution table.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn execute(&self, query: &str) -> Result<QuerySolutions, QueryError>;
}
