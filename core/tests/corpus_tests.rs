use newsdex_core::corpus::{build_from_dir, discover_batches, load_news, load_news_many};
use newsdex_core::postings::is_sorted_unique;
use newsdex_core::{IndexError, IndexOptions, FIELDS};
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn write_batch(path: &std::path::Path, articles: &[&str]) {
    let items: Vec<_> = articles
        .iter()
        .enumerate()
        .map(|(i, a)| {
            json!({
                "title": format!("Noticia {i}"),
                "date": "2016-03-01",
                "keywords": "economía, política",
                "article": a,
                "summary": a,
            })
        })
        .collect();
    fs::write(path, serde_json::to_string(&items).unwrap()).unwrap();
}

#[test]
fn builds_batches_in_path_order() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("2016/03")).unwrap();
    write_batch(&dir.path().join("2016/03/02.json"), &["el paro baja", "sube el paro"]);
    write_batch(&dir.path().join("2016/03/01.json"), &["elecciones generales"]);
    fs::write(dir.path().join("notes.txt"), "not a batch").unwrap();

    let files = discover_batches(dir.path()).unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("2016/03/01.json"));

    let index = build_from_dir(dir.path(), IndexOptions::default()).unwrap();
    assert_eq!(index.num_batches(), 2);
    assert_eq!(index.num_news(), 3);
    assert_eq!(index.postings("article", "paro"), &[2, 3]);
    assert_eq!(index.postings("keywords", "economía"), &[1, 2, 3]);

    let third = load_news(&index, 3).unwrap();
    assert_eq!(third["article"], "sube el paro");
    assert!(matches!(load_news(&index, 4), Err(IndexError::UnknownNews(4))));

    for field in FIELDS {
        for (_, postings) in index.terms(field.name) {
            assert!(is_sorted_unique(postings));
        }
    }
}

#[test]
fn loads_many_news_in_request_order() {
    let dir = tempdir().unwrap();
    write_batch(&dir.path().join("01.json"), &["uno", "dos"]);
    write_batch(&dir.path().join("02.json"), &["tres"]);
    let index = build_from_dir(dir.path(), IndexOptions::default()).unwrap();

    let loaded = load_news_many(&index, &[3, 1, 2]).unwrap();
    let articles: Vec<_> = loaded.iter().map(|(id, news)| (*id, news["article"].as_str().unwrap())).collect();
    assert_eq!(articles, vec![(3, "tres"), (1, "uno"), (2, "dos")]);

    assert!(load_news_many(&index, &[]).unwrap().is_empty());
    assert!(matches!(load_news_many(&index, &[1, 9]), Err(IndexError::UnknownNews(9))));
}

#[test]
fn corrupt_batch_aborts_build() {
    let dir = tempdir().unwrap();
    write_batch(&dir.path().join("a.json"), &["texto"]);
    fs::write(dir.path().join("b.json"), "[{\"title\": ").unwrap();
    let err = build_from_dir(dir.path(), IndexOptions::default()).unwrap_err();
    assert!(matches!(err, IndexError::Parse { .. }));

    fs::write(dir.path().join("b.json"), "{\"title\": \"x\"}").unwrap();
    let err = build_from_dir(dir.path(), IndexOptions::default()).unwrap_err();
    assert!(matches!(err, IndexError::NotAnArray { .. }));
}

#[test]
fn incomplete_record_aborts_build() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.json"), json!([{ "title": "t", "article": "a" }]).to_string()).unwrap();
    let err = build_from_dir(dir.path(), IndexOptions::default()).unwrap_err();
    assert!(matches!(err, IndexError::MissingField { position: 0, .. }));

    // the basic single-field index only needs `article`
    let index = build_from_dir(dir.path(), IndexOptions { multifield: false }).unwrap();
    assert_eq!(index.postings("article", "a"), &[1]);
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempdir().unwrap();
    let err = build_from_dir(&dir.path().join("nope"), IndexOptions::default()).unwrap_err();
    assert!(matches!(err, IndexError::Walk(_)));
}
