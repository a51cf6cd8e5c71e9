//! Comparative retrieval evaluation.
//!
//! Runs one baseline channel (dense or sparse) against hybrid RRF search over
//! a labeled evaluation set and reports Pass@K recall for both.
//!
//! # Example
//!
//! ```ignore
//! use hybridbench_core::evaluation::{load_evaluation_set, ComparativeEvaluator, EvalConfig};
//! use hybridbench_core::evaluation::transcript::TranscriptWriter;
//! use hybridbench_core::search::Channel;
//!
//! let queries = load_evaluation_set(Path::new("evaluation_set.jsonl"))?;
//! let config = EvalConfig::new(Channel::Dense);
//! let evaluator = ComparativeEvaluator::new(&collection, embedder.as_ref(), config);
//! evaluator.validate(&queries)?;
//!
//! let mut transcripts = TranscriptWriter::create(Path::new("."), config.baseline)?;
//! let state = evaluator
//!     .run(&queries, &mut transcripts, |p| println!("{}", p.score_line()))
//!     .await?;
//! transcripts.finish()?;
//! ```

pub mod dataset;
pub mod matching;
pub mod metrics;
pub mod runner;
pub mod state;
pub mod stats;
pub mod summary;
pub mod transcript;

pub use dataset::{
    load_evaluation_set, parse_evaluation_set, EvaluationQuery, GoldenChunk, GoldenChunkRef,
    GoldenContent, GoldenDocument,
};
pub use matching::{match_golden, MatchMode, MatchOutcome};
pub use metrics::{pass_at_k, reciprocal_rank};
pub use runner::{ComparativeEvaluator, EmptyGoldPolicy, EvalConfig, QueryProgress};
pub use state::{EvaluationState, Outcome};
pub use stats::{paired_ttest, TTestResult};
pub use summary::EvaluationSummary;
pub use transcript::TranscriptWriter;
