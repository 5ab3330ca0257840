use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{IndexError, Result};
use crate::fields::{Field, DEFAULT_FIELD, FIELDS};

pub type DocId = u32;
pub type NewsId = u32;
/// Strictly increasing, duplicate-free news ids.
pub type PostingList = Vec<NewsId>;

/// One ingested batch file and the news items it holds, in file order.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub doc_id: DocId,
    pub source: PathBuf,
    pub news: Vec<NewsId>,
}

/// Where a news item lives: its batch and zero-based position inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewsLocation {
    pub doc_id: DocId,
    pub position: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct IndexOptions {
    /// Index every field of the field table; otherwise only the default field.
    pub multifield: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self { multifield: true }
    }
}

impl IndexOptions {
    pub fn fields(&self) -> impl Iterator<Item = &'static Field> + '_ {
        FIELDS.iter().filter(move |f| self.multifield || f.name == DEFAULT_FIELD)
    }
}

/// A news record as handed over by ingestion: named fields with text content.
pub trait FieldSource {
    fn field_text(&self, name: &str) -> Option<&str>;
}

impl FieldSource for serde_json::Value {
    fn field_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(serde_json::Value::as_str)
    }
}

impl FieldSource for HashMap<String, String> {
    fn field_text(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    pub postings: HashMap<&'static str, HashMap<String, PostingList>>, // field -> term -> news ids
}

impl InvertedIndex {
    fn push(&mut self, field: &'static str, term: String, news_id: NewsId) {
        let plist = self.postings.entry(field).or_default().entry(term).or_default();
        // ids arrive in increasing order, so checking the tail keeps the list sorted and unique
        if plist.last() != Some(&news_id) {
            plist.push(news_id);
        }
    }
}

/// Identifier for the `count`-th batch or news item (ids start at 1).
fn id_for(count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| IndexError::IdOverflow(count))
}

/// Mutable, build-time form of the index. Call [`IndexBuilder::seal`] before querying.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    options: IndexOptions,
    index: InvertedIndex,
    docs: Vec<Batch>,
    news: Vec<NewsLocation>,
}

impl IndexBuilder {
    pub fn new(options: IndexOptions) -> Self {
        Self { options, ..Self::default() }
    }

    /// Index one batch. Every record is checked for the active fields before anything
    /// is written, so a failing batch leaves the builder untouched.
    pub fn ingest_batch<R: FieldSource>(&mut self, source: impl Into<PathBuf>, records: &[R]) -> Result<DocId> {
        let source = source.into();
        let options = self.options;
        let fields: Vec<&'static Field> = options.fields().collect();

        let mut contents: Vec<Vec<&str>> = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let row = fields
                .iter()
                .map(|field| {
                    record.field_text(field.name).ok_or_else(|| IndexError::MissingField {
                        path: source.clone(),
                        position,
                        field: field.name,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            contents.push(row);
        }

        let doc_id = id_for(self.docs.len() + 1)?;
        // the whole batch must fit in the id space before anything is written
        id_for(self.news.len() + contents.len())?;
        let mut news = Vec::with_capacity(contents.len());
        for (position, row) in contents.into_iter().enumerate() {
            self.news.push(NewsLocation { doc_id, position });
            let news_id = id_for(self.news.len())?;
            for (field, text) in fields.iter().zip(row) {
                for term in field.terms(text) {
                    self.index.push(field.name, term, news_id);
                }
            }
            news.push(news_id);
        }

        debug!(doc_id, news = news.len(), source = %source.display(), "ingested batch");
        self.docs.push(Batch { doc_id, source, news });
        Ok(doc_id)
    }

    pub fn num_news(&self) -> usize { self.news.len() }

    /// Finish construction. The returned index is read-only.
    pub fn seal(self) -> NewsIndex {
        NewsIndex { options: self.options, index: self.index, docs: self.docs, news: self.news }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldStats {
    pub field: &'static str,
    pub terms: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub batches: usize,
    pub news: usize,
    pub fields: Vec<FieldStats>,
}

/// Sealed inverted index over news items, shared read-only by queries.
#[derive(Debug)]
pub struct NewsIndex {
    options: IndexOptions,
    index: InvertedIndex,
    docs: Vec<Batch>,
    news: Vec<NewsLocation>,
}

impl NewsIndex {
    pub fn num_news(&self) -> usize { self.news.len() }

    /// Largest news id, i.e. the universe `1..=n` complements are taken against.
    pub fn universe(&self) -> NewsId {
        // ingestion rejects batches that would overflow the id space
        self.news.len().try_into().unwrap_or(NewsId::MAX)
    }

    pub fn num_batches(&self) -> usize { self.docs.len() }

    /// Posting list for a term in a field; unknown fields and terms give an empty list.
    pub fn postings(&self, field: &str, term: &str) -> &[NewsId] {
        self.index
            .postings
            .get(field)
            .and_then(|terms| terms.get(term))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All `(term, postings)` pairs of one field, in no particular order.
    pub fn terms<'a>(&'a self, field: &str) -> impl Iterator<Item = (&'a str, &'a [NewsId])> + 'a {
        self.index
            .postings
            .get(field)
            .into_iter()
            .flat_map(|terms| terms.iter().map(|(t, p)| (t.as_str(), p.as_slice())))
    }

    pub fn locate(&self, news_id: NewsId) -> Option<NewsLocation> {
        let idx = (news_id as usize).checked_sub(1)?;
        self.news.get(idx).copied()
    }

    pub fn batch(&self, doc_id: DocId) -> Option<&Batch> {
        let idx = (doc_id as usize).checked_sub(1)?;
        self.docs.get(idx)
    }

    pub fn batches(&self) -> &[Batch] { &self.docs }

    /// Source file and position of a news item.
    pub fn source_of(&self, news_id: NewsId) -> Option<(&Path, usize)> {
        let loc = self.locate(news_id)?;
        let batch = self.batch(loc.doc_id)?;
        Some((batch.source.as_path(), loc.position))
    }

    pub fn stats(&self) -> IndexStats {
        let fields = self
            .options
            .fields()
            .map(|f| FieldStats {
                field: f.name,
                terms: self.index.postings.get(f.name).map_or(0, HashMap::len),
            })
            .collect();
        IndexStats { batches: self.docs.len(), news: self.news.len(), fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(title: &str, article: &str) -> serde_json::Value {
        json!({
            "title": title,
            "date": "2015-01-01",
            "keywords": "",
            "article": article,
            "summary": "",
        })
    }

    #[test]
    fn assigns_sequential_ids_across_batches() {
        let mut builder = IndexBuilder::new(IndexOptions::default());
        let d1 = builder.ingest_batch("a.json", &[record("t", "uno"), record("t", "dos")]).unwrap();
        let d2 = builder.ingest_batch("b.json", &[record("t", "tres")]).unwrap();
        let index = builder.seal();

        assert_eq!((d1, d2), (1, 2));
        assert_eq!(index.num_news(), 3);
        assert_eq!(index.locate(3), Some(NewsLocation { doc_id: 2, position: 0 }));
        assert_eq!(index.locate(0), None);
        assert_eq!(index.batch(1).unwrap().news, vec![1, 2]);
        assert_eq!(index.source_of(2), Some((Path::new("a.json"), 1)));
    }

    #[test]
    fn repeated_terms_are_posted_once() {
        let mut builder = IndexBuilder::new(IndexOptions::default());
        builder.ingest_batch("a.json", &[record("gato gato", "gato, GATO y gato")]).unwrap();
        let index = builder.seal();
        assert_eq!(index.postings("article", "gato"), &[1]);
        assert_eq!(index.postings("title", "gato"), &[1]);
        assert_eq!(index.postings("date", "2015-01-01"), &[1]);
    }

    #[test]
    fn missing_field_rejects_whole_batch() {
        let mut builder = IndexBuilder::new(IndexOptions::default());
        let bad = vec![record("t", "uno"), json!({ "title": "t", "article": "dos" })];
        let err = builder.ingest_batch("bad.json", &bad).unwrap_err();
        assert!(matches!(err, IndexError::MissingField { position: 1, field: "date", .. }));
        assert_eq!(builder.num_news(), 0);

        builder.ingest_batch("good.json", &[record("t", "uno")]).unwrap();
        let index = builder.seal();
        assert_eq!(index.batches()[0].doc_id, 1);
        assert_eq!(index.postings("article", "uno"), &[1]);
    }

    #[test]
    fn ids_beyond_u32_are_rejected() {
        assert_eq!(id_for(7).unwrap(), 7);
        assert_eq!(id_for(u32::MAX as usize).unwrap(), u32::MAX);
        let err = id_for(u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, IndexError::IdOverflow(n) if n == u32::MAX as usize + 1));
    }

    #[test]
    fn universe_tracks_news_count() {
        let mut builder = IndexBuilder::new(IndexOptions::default());
        builder.ingest_batch("a.json", &[record("t", "uno"), record("t", "dos")]).unwrap();
        assert_eq!(builder.seal().universe(), 2);
        assert_eq!(IndexBuilder::default().seal().universe(), 0);
    }

    #[test]
    fn article_only_mode_skips_other_fields() {
        let mut builder = IndexBuilder::new(IndexOptions { multifield: false });
        let mut news = HashMap::new();
        news.insert("article".to_string(), "gato".to_string());
        builder.ingest_batch("a.json", &[news]).unwrap();
        let index = builder.seal();
        assert_eq!(index.postings("article", "gato"), &[1]);
        assert!(index.postings("title", "gato").is_empty());
        assert_eq!(index.stats().fields.len(), 1);
    }
}
