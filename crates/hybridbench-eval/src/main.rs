//! Hybridbench - compare single-channel retrieval against hybrid RRF search.
//!
//! # Usage
//!
//! ```bash
//! # Dense baseline vs hybrid (requires VOYAGE_API)
//! hybridbench compare --eval-set evaluation_set.jsonl --corpus codebase_chunks.json
//!
//! # Sparse baseline, offline embedder, JSON summary
//! hybridbench compare --baseline sparse --embedder hashed --json
//!
//! # Inspect what a single channel returns
//! hybridbench search "parse config file" --channel sparse -n 5
//! ```

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use config::EmbedderArgs;
use hybridbench_core::config::{CORPUS_FILENAME, DEFAULT_TOP_K, EVALUATION_SET_FILENAME, RRF_K};
use hybridbench_core::embedding::Embedder;
use hybridbench_core::evaluation::transcript::{bad_case_path, good_case_path};
use hybridbench_core::evaluation::{
    load_evaluation_set, ComparativeEvaluator, EmptyGoldPolicy, EvalConfig, EvaluationSummary,
    MatchMode, TranscriptWriter,
};
use hybridbench_core::processing::{load_corpus, IndexingPipeline, IndexingStats};
use hybridbench_core::search::{Channel, ChannelQuery, ChunkCollection, RrfRanker};
use indicatif::{ProgressBar, ProgressStyle};
use output::{CompareReport, TranscriptPaths};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser)]
#[command(name = "hybridbench", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run a baseline channel against hybrid search over an evaluation set
    Compare(CompareArgs),
    /// Run one query against a single channel or hybrid search
    Search(SearchArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BaselineArg {
    Dense,
    Sparse,
}

impl From<BaselineArg> for Channel {
    fn from(arg: BaselineArg) -> Self {
        match arg {
            BaselineArg::Dense => Channel::Dense,
            BaselineArg::Sparse => Channel::Sparse,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SearchChannel {
    Dense,
    Sparse,
    Hybrid,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MatchModeArg {
    /// Trimmed result content equals gold content
    Content,
    /// Same source document uuid and chunk index
    ChunkRef,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Content => MatchMode::Content,
            MatchModeArg::ChunkRef => MatchMode::ChunkRef,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmptyGoldArg {
    /// Abort before searching if any query has no resolvable gold
    Fail,
    /// Warn and leave such queries out of the aggregates
    Skip,
}

impl From<EmptyGoldArg> for EmptyGoldPolicy {
    fn from(arg: EmptyGoldArg) -> Self {
        match arg {
            EmptyGoldArg::Fail => EmptyGoldPolicy::Fail,
            EmptyGoldArg::Skip => EmptyGoldPolicy::Skip,
        }
    }
}

#[derive(Args)]
struct CompareArgs {
    /// Evaluation set (one JSON query record per line)
    #[arg(long, default_value = EVALUATION_SET_FILENAME)]
    eval_set: PathBuf,

    /// Corpus of chunked documents (JSON array)
    #[arg(long, default_value = CORPUS_FILENAME)]
    corpus: PathBuf,

    /// Channel compared against hybrid search
    #[arg(long, value_enum, default_value = "dense")]
    baseline: BaselineArg,

    /// Results requested per search and scored for Pass@K
    #[arg(short = 'k', long = "top-k", default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// RRF smoothing constant
    #[arg(long, default_value_t = RRF_K)]
    rrf_k: usize,

    /// How retrieved chunks are matched against gold chunks
    #[arg(long, value_enum, default_value = "content")]
    match_mode: MatchModeArg,

    /// Handling of queries whose gold references all fail to resolve
    #[arg(long, value_enum, default_value = "fail")]
    on_empty_gold: EmptyGoldArg,

    /// Directory for the good-case and bad-case transcripts
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Output the summary as JSON (per-query lines go to stderr)
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    embedder: EmbedderArgs,
}

#[derive(Args)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Corpus of chunked documents (JSON array)
    #[arg(long, default_value = CORPUS_FILENAME)]
    corpus: PathBuf,

    /// Channel to search
    #[arg(long, value_enum, default_value = "hybrid")]
    channel: SearchChannel,

    /// Maximum number of results to return
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_K)]
    limit: usize,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    embedder: EmbedderArgs,
}

// =============================================================================
// Indexing
// =============================================================================

async fn index_corpus(
    embedder: Arc<dyn Embedder>,
    corpus: &Path,
) -> Result<(ChunkCollection, IndexingStats)> {
    let documents = load_corpus(corpus)
        .with_context(|| format!("Failed to load corpus from {}", corpus.display()))?;

    let pb = ProgressBar::new(0);
    pb.set_style(ProgressStyle::default_bar().template("{msg} [{bar:40}] {pos}/{len}")?);
    pb.set_message("Chunks");

    let result = IndexingPipeline::new(embedder)
        .build_collection(&documents, |progress| {
            pb.set_length(progress.chunks_total as u64);
            pb.set_position(progress.chunks_completed as u64);
            if progress.is_complete() {
                pb.finish_with_message("Indexed");
            }
        })
        .await;
    if result.is_err() {
        pb.abandon();
    } else if !pb.is_finished() {
        pb.finish();
    }

    result.context("Failed to index corpus")
}

// =============================================================================
// Commands
// =============================================================================

async fn run_compare(args: CompareArgs) -> Result<()> {
    let embedder = config::build_embedder(&args.embedder)?;
    let queries = load_evaluation_set(&args.eval_set).with_context(|| {
        format!(
            "Failed to load evaluation set from {}",
            args.eval_set.display()
        )
    })?;
    let (collection, stats) = index_corpus(embedder.clone(), &args.corpus).await?;

    let baseline = Channel::from(args.baseline);
    let mut eval_config = EvalConfig::new(baseline);
    eval_config.top_k = args.top_k;
    eval_config.ranker = RrfRanker::new(args.rrf_k);
    eval_config.match_mode = args.match_mode.into();
    eval_config.empty_gold = args.on_empty_gold.into();

    let evaluator = ComparativeEvaluator::new(&collection, embedder.as_ref(), eval_config);
    // Reject the run before truncating transcripts from a previous one
    evaluator.validate(&queries)?;

    let mut transcripts = TranscriptWriter::create(&args.output_dir, baseline).with_context(|| {
        format!(
            "Failed to create transcripts in {}",
            args.output_dir.display()
        )
    })?;

    info!(queries = queries.len(), %baseline, "starting comparison");
    let json = args.json;
    let state = evaluator
        .run(&queries, &mut transcripts, |progress| {
            if json {
                eprintln!("{}", progress.query_line());
                eprintln!("{}", progress.score_line());
            } else {
                println!("{}", progress.query_line());
                println!("{}", progress.score_line());
            }
        })
        .await?;
    transcripts
        .finish()
        .context("Failed to flush transcripts")?;

    let report = CompareReport {
        corpus: stats,
        embedder: embedder.model_id().to_string(),
        summary: EvaluationSummary::from_state(&state, evaluator.config()),
        transcripts: TranscriptPaths {
            good_case: good_case_path(&args.output_dir, baseline),
            bad_case: bad_case_path(&args.output_dir, baseline),
        },
    };

    let rendered = if json {
        output::format_report_json(&report)
    } else {
        output::format_report_human(&report)
    };
    println!("{}", rendered);
    Ok(())
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let embedder = config::build_embedder(&args.embedder)?;
    let (collection, _) = index_corpus(embedder.clone(), &args.corpus).await?;

    let results = match args.channel {
        SearchChannel::Sparse => {
            let request = ChannelQuery::Sparse(args.query.clone());
            collection.search_channel(&request, args.limit)?
        }
        SearchChannel::Dense => {
            let request = ChannelQuery::Dense(embedder.embed(&args.query).await?);
            collection.search_channel(&request, args.limit)?
        }
        SearchChannel::Hybrid => {
            let requests = [
                ChannelQuery::Sparse(args.query.clone()),
                ChannelQuery::Dense(embedder.embed(&args.query).await?),
            ];
            collection.hybrid_search(&requests, RrfRanker::default(), args.limit)?
        }
    };

    let channel = match args.channel {
        SearchChannel::Dense => "dense",
        SearchChannel::Sparse => "sparse",
        SearchChannel::Hybrid => "hybrid",
    };
    let rendered = if args.json {
        output::format_search_json(&args.query, channel, &results)
    } else {
        output::format_search_human(&args.query, channel, &results)
    };
    println!("{}", rendered);
    Ok(())
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Compare(args) => run_compare(args).await,
        Command::Search(args) => run_search(args).await,
    }
}
