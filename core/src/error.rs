use std::path::PathBuf;
use thiserror::Error;

use crate::index::NewsId;
use crate::query::Operator;

/// Errors raised while building the index or reading news back from the corpus.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("{}: news item {position} has no text field `{field}`", path.display())]
    MissingField { path: PathBuf, position: usize, field: &'static str },

    #[error("{}: expected a JSON array of news objects", path.display())]
    NotAnArray { path: PathBuf },

    #[error("failed to walk corpus: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, #[source] source: serde_json::Error },

    #[error("corpus too large: item {0} does not fit a 32-bit id")]
    IdOverflow(usize),

    #[error("unknown news id {0}")]
    UnknownNews(NewsId),
}

pub type Result<T> = std::result::Result<T, IndexError>;

/// A query whose operator/operand sequence cannot be evaluated left to right.
/// Positions are 1-based token indexes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("operator {operator} at token {position} has no left operand")]
    MissingLeftOperand { operator: Operator, position: usize },

    #[error("operator {operator} at token {position} follows pending operator {pending}")]
    UnexpectedOperator { operator: Operator, pending: Operator, position: usize },

    #[error("operand `{operand}` at token {position} is not joined by AND or OR")]
    MissingOperator { operand: String, position: usize },

    #[error("query ends with dangling operator {operator}")]
    DanglingOperator { operator: Operator },

    #[error("operand `{operand}` at token {position} has an empty field or term")]
    EmptyOperand { operand: String, position: usize },
}
