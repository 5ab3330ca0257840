//! Boolean retrieval over batches of news articles.
//!
//! [`IndexBuilder`] ingests batches into a per-field inverted index and is sealed into a
//! read-only [`NewsIndex`]; [`query::solve_query`] evaluates `AND`/`OR`/`NOT` queries
//! against it with the merges in [`postings`].

pub mod corpus;
pub mod error;
pub mod extensions;
pub mod fields;
pub mod index;
pub mod postings;
pub mod query;
pub mod snippet;
pub mod tokenizer;

pub use error::{IndexError, QueryError};
pub use fields::{Field, DEFAULT_FIELD, FIELDS};
pub use index::{Batch, DocId, FieldSource, IndexBuilder, IndexOptions, IndexStats, NewsId, NewsIndex, NewsLocation, PostingList};
pub use query::{solve_and_count, solve_query};
