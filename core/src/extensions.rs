//! Hooks for retrieval extensions that are not part of the Boolean engine.
//!
//! Each trait fixes the contract a future implementation plugs into; the provided
//! implementations are inert and leave plain Boolean retrieval unchanged.

use crate::index::{NewsId, NewsIndex, PostingList};

/// Folds a term to its canonical stem.
pub trait StemLookup {
    fn stem(&self, term: &str) -> String;
}

/// Expands a wildcard pattern (`*`, `?`) into the index terms it matches.
pub trait WildcardLookup {
    fn expand(&self, index: &NewsIndex, field: &str, pattern: &str) -> Vec<String>;
}

/// Resolves a sequence of terms that must appear at adjacent positions.
/// `None` means positional lookups are not supported.
pub trait PhraseLookup {
    fn positional(&self, index: &NewsIndex, field: &str, terms: &[&str]) -> Option<PostingList>;
}

/// Reorders a result list by relevance. An empty return means "no ranking".
pub trait Ranker {
    fn rank(&self, postings: &[NewsId], query: &str) -> Vec<NewsId>;
}

pub struct NoStemming;

impl StemLookup for NoStemming {
    fn stem(&self, term: &str) -> String {
        term.to_string()
    }
}

pub struct NoWildcards;

impl WildcardLookup for NoWildcards {
    fn expand(&self, _index: &NewsIndex, _field: &str, pattern: &str) -> Vec<String> {
        if pattern.contains(|c: char| c == '*' || c == '?') {
            Vec::new()
        } else {
            vec![pattern.to_string()]
        }
    }
}

pub struct NoPositional;

impl PhraseLookup for NoPositional {
    fn positional(&self, _index: &NewsIndex, _field: &str, _terms: &[&str]) -> Option<PostingList> {
        None
    }
}

pub struct NoRanking;

impl Ranker for NoRanking {
    fn rank(&self, _postings: &[NewsId], _query: &str) -> Vec<NewsId> {
        Vec::new()
    }
}

/// Ranked order of `postings`, or the original order when the ranker does not
/// return a permutation of it.
pub fn ranked_or_unranked<R: Ranker + ?Sized>(ranker: &R, postings: &[NewsId], query: &str) -> Vec<NewsId> {
    let ranked = ranker.rank(postings, query);
    let mut check = ranked.clone();
    check.sort_unstable();
    if check.as_slice() == postings {
        ranked
    } else {
        postings.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexBuilder, IndexOptions};

    struct Reverse;

    impl Ranker for Reverse {
        fn rank(&self, postings: &[NewsId], _query: &str) -> Vec<NewsId> {
            postings.iter().rev().copied().collect()
        }
    }

    #[test]
    fn disabled_ranking_keeps_result_identity() {
        assert_eq!(ranked_or_unranked(&NoRanking, &[1, 4, 9], "q"), vec![1, 4, 9]);
        assert_eq!(ranked_or_unranked(&Reverse, &[1, 4, 9], "q"), vec![9, 4, 1]);
    }

    #[test]
    fn stemming_is_identity() {
        assert_eq!(NoStemming.stem("gatos"), "gatos");
    }

    #[test]
    fn inert_lookups() {
        let index = IndexBuilder::new(IndexOptions::default()).seal();
        assert_eq!(NoWildcards.expand(&index, "article", "gato"), vec!["gato"]);
        assert!(NoWildcards.expand(&index, "article", "ga*o").is_empty());
        assert_eq!(NoPositional.positional(&index, "article", &["el", "gato"]), None);
    }
}
