use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use crate::error::{IndexError, Result};
use crate::index::{DocId, IndexBuilder, IndexOptions, NewsId, NewsIndex};

/// Batch files under `root` (recursively, `*.json`), in a stable order. A file path is
/// returned as the only batch.
pub fn discover_batches(root: &Path) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let p = entry.path();
        if entry.file_type().is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(p.to_path_buf());
        }
    }
    Ok(files)
}

/// Parse one batch file: a JSON array with one object per news item.
pub fn read_batch(path: &Path) -> Result<Vec<Value>> {
    let f = File::open(path).map_err(|source| IndexError::Io { path: path.to_path_buf(), source })?;
    let json: Value = serde_json::from_reader(BufReader::new(f))
        .map_err(|source| IndexError::Parse { path: path.to_path_buf(), source })?;
    match json {
        Value::Array(items) => Ok(items),
        _ => Err(IndexError::NotAnArray { path: path.to_path_buf() }),
    }
}

/// Build and seal an index over every batch under `root`. The first bad batch aborts the build.
pub fn build_from_dir(root: &Path, options: IndexOptions) -> Result<NewsIndex> {
    let mut builder = IndexBuilder::new(options);
    for file in discover_batches(root)? {
        let items = read_batch(&file)?;
        builder.ingest_batch(file, &items)?;
    }
    let index = builder.seal();
    info!(batches = index.num_batches(), news = index.num_news(), root = %root.display(), "index built");
    Ok(index)
}

/// Re-read a news item from its batch file.
pub fn load_news(index: &NewsIndex, news_id: NewsId) -> Result<Value> {
    let (path, position) = index.source_of(news_id).ok_or(IndexError::UnknownNews(news_id))?;
    read_batch(path)?
        .into_iter()
        .nth(position)
        .ok_or(IndexError::UnknownNews(news_id))
}

/// Re-read several news items, parsing each batch file once. The result follows the
/// order of `news_ids`.
pub fn load_news_many(index: &NewsIndex, news_ids: &[NewsId]) -> Result<Vec<(NewsId, Value)>> {
    // batch -> (slot in news_ids, position in batch)
    let mut by_batch: BTreeMap<DocId, Vec<(usize, usize)>> = BTreeMap::new();
    for (slot, &news_id) in news_ids.iter().enumerate() {
        let loc = index.locate(news_id).ok_or(IndexError::UnknownNews(news_id))?;
        by_batch.entry(loc.doc_id).or_default().push((slot, loc.position));
    }

    let mut loaded: Vec<Value> = vec![Value::Null; news_ids.len()];
    for (doc_id, wanted) in by_batch {
        let unknown = || IndexError::UnknownNews(news_ids[wanted[0].0]);
        let batch = index.batch(doc_id).ok_or_else(unknown)?;
        let items = read_batch(&batch.source)?;
        for &(slot, position) in &wanted {
            loaded[slot] = items.get(position).cloned().ok_or(IndexError::UnknownNews(news_ids[slot]))?;
        }
    }
    Ok(news_ids.iter().copied().zip(loaded).collect())
}
