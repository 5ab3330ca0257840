use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use newsdex_core::corpus::{build_from_dir, load_news_many};
use newsdex_core::extensions::{ranked_or_unranked, NoRanking};
use newsdex_core::snippet::{query_terms, snippet};
use newsdex_core::{solve_query, IndexOptions, NewsId, NewsIndex};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::{Path, PathBuf};

/// Results listed per query unless `--all` is given.
const SHOW_MAX: usize = 10;
/// Words of context on each side of a snippet hit.
const SNIPPET_CONTEXT: usize = 4;

#[derive(Parser)]
#[command(name = "newsdex")]
#[command(about = "Build a Boolean index over news batches and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CorpusArgs {
    /// Corpus directory (searched recursively for *.json batches) or a single batch file
    #[arg(long)]
    corpus: PathBuf,
    /// Index only the article field
    #[arg(long, default_value_t = false)]
    article_only: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print its statistics
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Build the index and solve a query, or every line of a query file
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Query to solve
        #[arg(short, long, required_unless_present = "query_file", conflicts_with = "query_file")]
        query: Option<String>,
        /// File with one query per line
        #[arg(long)]
        query_file: Option<PathBuf>,
        /// Only print the number of results of each query
        #[arg(long, default_value_t = false)]
        count: bool,
        /// List every result instead of the first ten
        #[arg(long, default_value_t = false)]
        all: bool,
        /// Print an article snippet around the query terms
        #[arg(long, default_value_t = false)]
        snippet: bool,
        /// Order results with the ranker before listing them
        #[arg(long, default_value_t = false)]
        rank: bool,
    },
}

struct ShowOptions {
    all: bool,
    snippet: bool,
    rank: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { corpus } => {
            let index = build_index(&corpus)?;
            show_stats(&index);
            Ok(())
        }
        Commands::Search { corpus, query, query_file, count, all, snippet, rank } => {
            let index = build_index(&corpus)?;
            let queries = match (query, query_file) {
                (Some(q), _) => vec![q],
                (None, Some(path)) => read_queries(&path)?,
                (None, None) => Vec::new(),
            };
            let show = ShowOptions { all, snippet, rank };
            let mut total = 0;
            for q in &queries {
                total += if count { solve_and_count(&index, q) } else { solve_and_show(&index, q, &show)? };
            }
            tracing::info!(queries = queries.len(), total, "queries solved");
            Ok(())
        }
    }
}

fn build_index(args: &CorpusArgs) -> Result<NewsIndex> {
    let options = IndexOptions { multifield: !args.article_only };
    build_from_dir(&args.corpus, options).with_context(|| format!("indexing {}", args.corpus.display()))
}

fn read_queries(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_owned).collect())
}

fn show_stats(index: &NewsIndex) {
    let stats = index.stats();
    println!("{}", "=".repeat(40));
    println!("Number of indexed batches: {}", stats.batches);
    println!("{}", "-".repeat(40));
    println!("Number of indexed news: {}", stats.news);
    println!("{}", "-".repeat(40));
    println!("TOKENS:");
    for f in &stats.fields {
        println!("\t# of tokens in '{}': {}", f.field, f.terms);
    }
    println!("{}", "=".repeat(40));
}

fn solve_and_count(index: &NewsIndex, query: &str) -> usize {
    match solve_query(index, query) {
        Ok(result) => {
            println!("{}", count_line(query, result.len()));
            result.len()
        }
        Err(err) => {
            tracing::warn!(query, %err, "rejected query");
            println!("{query}\terror: {err}");
            0
        }
    }
}

fn solve_and_show(index: &NewsIndex, query: &str, show: &ShowOptions) -> Result<usize> {
    println!("Query: '{query}'");
    let result = match solve_query(index, query) {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(query, %err, "rejected query");
            println!("Error: {err}");
            return Ok(0);
        }
    };
    println!("Number of results: {}", result.len());

    let ordered = if show.rank { ranked_or_unranked(&NoRanking, &result, query) } else { result.clone() };
    let limit = display_limit(ordered.len(), show.all);
    let terms = query_terms(query);
    let page = load_news_many(index, &ordered[..limit]).context("loading result news")?;
    for (i, (news_id, news)) in page.iter().enumerate() {
        print_news(i + 1, *news_id, news, show.snippet.then_some(terms.as_slice()));
    }
    if ordered.len() > limit {
        println!("... {} more", ordered.len() - limit);
    }
    Ok(result.len())
}

/// Line printed per query in count mode.
fn count_line(query: &str, count: usize) -> String {
    format!("{query}\t{count}")
}

/// Number of results listed for a query.
fn display_limit(total: usize, all: bool) -> usize {
    if all { total } else { total.min(SHOW_MAX) }
}

fn print_news(rank: usize, news_id: NewsId, news: &Value, snippet_terms: Option<&[String]>) {
    let field = |name: &str| news.get(name).and_then(Value::as_str).unwrap_or_default().to_string();
    println!("#{rank}");
    println!("News ID: {news_id}");
    println!("Date: {}", field("date"));
    println!("Title: {}", field("title"));
    println!("Keywords: {}", field("keywords"));
    if let Some(terms) = snippet_terms {
        if let Some(s) = snippet(&field("article"), terms, SNIPPET_CONTEXT) {
            println!("{s}");
        }
    }
}
