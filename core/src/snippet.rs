use crate::query::Operator;
use crate::tokenizer::tokenize;

/// Normalized operand terms of a query, with operators and field prefixes removed.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|t| Operator::parse(t).is_none())
        .map(|t| t.rsplit_once(':').map_or(t, |(_, term)| term))
        .flat_map(tokenize)
        .collect()
}

/// Excerpt of `text` with `context` words around the first occurrence of each term.
/// Overlapping windows are merged; `None` when no term occurs.
pub fn snippet(text: &str, terms: &[String], context: usize) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let normalized: Vec<Vec<String>> = words.iter().map(|w| tokenize(w)).collect();

    let mut hits: Vec<usize> = terms
        .iter()
        .filter_map(|term| normalized.iter().position(|toks| toks.contains(term)))
        .collect();
    if hits.is_empty() {
        return None;
    }
    hits.sort_unstable();
    hits.dedup();

    let mut windows: Vec<(usize, usize)> = Vec::new();
    for hit in hits {
        let start = hit.saturating_sub(context);
        let end = (hit + context + 1).min(words.len());
        if let Some(last) = windows.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        windows.push((start, end));
    }

    let mut out = String::new();
    let mut last_end = 0;
    for (start, end) in windows {
        if start > 0 {
            out.push_str("... ");
        }
        out.push_str(&words[start..end].join(" "));
        out.push(' ');
        last_end = end;
    }
    if last_end < words.len() {
        out.push_str("...");
    }
    Some(out.trim_end().to_string())
}
