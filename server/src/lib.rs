use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use newsdex_core::corpus::{build_from_dir, load_news, load_news_many};
use newsdex_core::snippet::{query_terms, snippet};
use newsdex_core::{solve_query, IndexError, IndexOptions, IndexStats, NewsId, NewsIndex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const SNIPPET_CONTEXT: usize = 8;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub count_only: bool,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    /// Every matching id, ascending. Empty when `count_only` was requested.
    pub news_ids: Vec<NewsId>,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub news_id: NewsId,
    pub doc_id: u32,
    pub position: usize,
    pub date: String,
    pub title: String,
    pub keywords: String,
    pub snippet: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<NewsIndex>,
}

/// Index the corpus under `corpus_dir` and build the router serving it.
pub fn build_app(corpus_dir: &str, options: IndexOptions) -> Result<Router> {
    let index = build_from_dir(std::path::Path::new(corpus_dir), options)?;
    Ok(router(Arc::new(index)))
}

pub fn router(index: Arc<NewsIndex>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/stats", get(stats_handler))
        .route("/search", get(search_handler))
        .route("/news/:news_id", get(news_handler))
        .with_state(AppState { index })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.index.stats())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let news_ids = solve_query(&state.index, &params.q).map_err(|err| {
        tracing::warn!(query = %params.q, %err, "rejected query");
        (StatusCode::BAD_REQUEST, err.to_string())
    })?;
    let total_hits = news_ids.len();

    if params.count_only {
        let elapsed = start.elapsed();
        return Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, news_ids: vec![], results: vec![] }));
    }

    let terms = query_terms(&params.q);
    let page: Vec<NewsId> = news_ids.iter().take(params.k.min(100)).copied().collect();
    let index = Arc::clone(&state.index);
    let results = tokio::task::spawn_blocking(move || materialize(&index, &page, &terms))
        .await
        .map_err(join_error)?
        .map_err(internal_error)?;

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, news_ids, results }))
}

pub async fn news_handler(
    State(state): State<AppState>,
    Path(news_id): Path<NewsId>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let loc = state
        .index
        .locate(news_id)
        .ok_or((StatusCode::NOT_FOUND, format!("unknown news id {news_id}")))?;
    let index = Arc::clone(&state.index);
    let news = tokio::task::spawn_blocking(move || load_news(&index, news_id))
        .await
        .map_err(join_error)?
        .map_err(internal_error)?;
    Ok(Json(serde_json::json!({
        "news_id": news_id,
        "doc_id": loc.doc_id,
        "position": loc.position,
        "news": news,
    })))
}

/// Search hits for `page`, reading each batch file once.
fn materialize(index: &NewsIndex, page: &[NewsId], terms: &[String]) -> Result<Vec<SearchHit>, IndexError> {
    load_news_many(index, page)?
        .into_iter()
        .map(|(news_id, news)| {
            let loc = index.locate(news_id).ok_or(IndexError::UnknownNews(news_id))?;
            let field = |name: &str| news.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
            Ok(SearchHit {
                news_id,
                doc_id: loc.doc_id,
                position: loc.position,
                date: field("date"),
                title: field("title"),
                keywords: field("keywords"),
                snippet: snippet(&field("article"), terms, SNIPPET_CONTEXT),
            })
        })
        .collect()
}

fn join_error(err: tokio::task::JoinError) -> (StatusCode, String) {
    tracing::error!(%err, "blocking task failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn internal_error(err: IndexError) -> (StatusCode, String) {
    tracing::error!(%err, "failed to load news");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
