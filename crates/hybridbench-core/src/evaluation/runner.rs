//! The comparative evaluation loop.
//!
//! For every query, in input order and strictly one after another:
//!
//! 1. resolve gold contents
//! 2. embed the query
//! 3. search the baseline channel, then run the fused hybrid search
//! 4. match both result lists against the gold contents and score Pass@K
//! 5. update [`EvaluationState`], report progress, and write a transcript
//!    record for wins and losses
//!
//! Any embedding, search or transcript failure aborts the run.

use super::dataset::{EvaluationQuery, GoldenContent};
use super::matching::{match_golden, MatchMode, MatchOutcome};
use super::metrics::{pass_at_k, reciprocal_rank};
use super::state::{ChannelScore, EvaluationState, Outcome};
use super::transcript::{TranscriptRecord, TranscriptWriter};
use crate::config::DEFAULT_TOP_K;
use crate::embedding::Embedder;
use crate::error::EvalError;
use crate::search::backend::{ChannelQuery, RetrievalBackend};
use crate::search::fusion::RrfRanker;
use crate::search::types::{Channel, RetrievedResult};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::{debug, info, instrument, warn};

/// What to do with a query whose gold references all fail to resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyGoldPolicy {
    /// Reject the evaluation set before any query is searched
    #[default]
    Fail,
    /// Log a warning and leave the query out of every aggregate
    Skip,
}

/// Parameters of a comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvalConfig {
    /// Channel hybrid search is compared against
    pub baseline: Channel,
    /// Results requested per search and scored for Pass@K
    pub top_k: usize,
    pub ranker: RrfRanker,
    pub match_mode: MatchMode,
    pub empty_gold: EmptyGoldPolicy,
}

impl EvalConfig {
    pub fn new(baseline: Channel) -> Self {
        Self {
            baseline,
            top_k: DEFAULT_TOP_K,
            ranker: RrfRanker::default(),
            match_mode: MatchMode::default(),
            empty_gold: EmptyGoldPolicy::default(),
        }
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::new(Channel::Dense)
    }
}

/// Snapshot passed to the progress callback after each scored query.
#[derive(Debug, Clone)]
pub struct QueryProgress<'a> {
    /// Number of queries scored so far, including this one
    pub evaluated: usize,
    pub query: &'a str,
    pub baseline: Channel,
    pub top_k: usize,
    /// Running mean Pass@K of the baseline
    pub baseline_mean_recall: f64,
    /// Running mean Pass@K of hybrid search
    pub hybrid_mean_recall: f64,
    /// Gold items the baseline found for this query
    pub baseline_found: usize,
    /// Gold items hybrid search found for this query
    pub hybrid_found: usize,
    pub outcome: Outcome,
}

impl QueryProgress<'_> {
    /// `{n} {query}`
    pub fn query_line(&self) -> String {
        format!("{} {}", self.evaluated, self.query)
    }

    /// `{n} {baseline} Pass@{K}: {mean} hybrid Pass@{K}: {mean} {baseline found} {hybrid found}`
    pub fn score_line(&self) -> String {
        format!(
            "{n} {baseline} Pass@{k}: {b} hybrid Pass@{k}: {h} {bf} {hf}",
            n = self.evaluated,
            baseline = self.baseline,
            k = self.top_k,
            b = self.baseline_mean_recall,
            h = self.hybrid_mean_recall,
            bf = self.baseline_found,
            hf = self.hybrid_found,
        )
    }
}

/// Runs a baseline channel against hybrid search over an evaluation set.
pub struct ComparativeEvaluator<'a> {
    backend: &'a dyn RetrievalBackend,
    embedder: &'a dyn Embedder,
    config: EvalConfig,
}

impl<'a> ComparativeEvaluator<'a> {
    pub fn new(
        backend: &'a dyn RetrievalBackend,
        embedder: &'a dyn Embedder,
        config: EvalConfig,
    ) -> Self {
        Self {
            backend,
            embedder,
            config,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Checks the configuration and gold resolution without searching.
    ///
    /// [`run`](Self::run) performs the same checks; callers that open output
    /// files first can use this to fail before touching them.
    ///
    /// # Errors
    ///
    /// - `EvalError::InvalidConfig` if `top_k` is zero
    /// - `EvalError::NoGoldenContents` under [`EmptyGoldPolicy::Fail`]
    pub fn validate(&self, queries: &[EvaluationQuery]) -> Result<(), EvalError> {
        self.resolve_gold(queries).map(|_| ())
    }

    fn resolve_gold(
        &self,
        queries: &[EvaluationQuery],
    ) -> Result<Vec<Vec<GoldenContent>>, EvalError> {
        if self.config.top_k == 0 {
            return Err(EvalError::InvalidConfig("top_k must be at least 1".to_string()));
        }

        let resolved: Vec<Vec<GoldenContent>> =
            queries.iter().map(EvaluationQuery::golden_contents).collect();

        if self.config.empty_gold == EmptyGoldPolicy::Fail {
            if let Some(index) = resolved.iter().position(Vec::is_empty) {
                return Err(EvalError::NoGoldenContents {
                    query_index: index,
                    query: queries[index].query.clone(),
                });
            }
        }
        Ok(resolved)
    }

    /// Evaluates every query once, in order.
    ///
    /// `on_query` is called after each scored query. Transcript records are
    /// appended to `transcripts`; the caller finishes the writer afterwards.
    ///
    /// # Errors
    ///
    /// - `EvalError::InvalidConfig` if `top_k` is zero
    /// - `EvalError::NoGoldenContents` under [`EmptyGoldPolicy::Fail`], raised
    ///   before any query is searched
    /// - embedding, search and transcript errors, raised at the failing query
    #[instrument(skip_all, fields(baseline = %self.config.baseline, k = self.config.top_k, queries = queries.len()))]
    pub async fn run<W, F>(
        &self,
        queries: &[EvaluationQuery],
        transcripts: &mut TranscriptWriter<W>,
        mut on_query: F,
    ) -> Result<EvaluationState, EvalError>
    where
        W: Write,
        F: FnMut(&QueryProgress<'_>),
    {
        let resolved = self.resolve_gold(queries)?;
        let mut state = EvaluationState::new();

        for (index, (query, gold)) in queries.iter().zip(&resolved).enumerate() {
            if gold.is_empty() {
                warn!(
                    query_index = index,
                    query = %query.query,
                    "skipping query with no resolvable golden contents"
                );
                state.record_skip();
                continue;
            }

            let (baseline_results, hybrid_results) = self.retrieve(&query.query).await?;

            let k = self.config.top_k;
            let mode = self.config.match_mode;
            let baseline_match = match_golden(gold, &baseline_results, k, mode);
            let hybrid_match = match_golden(gold, &hybrid_results, k, mode);

            let baseline_score = channel_score(&baseline_match, gold.len());
            let hybrid_score = channel_score(&hybrid_match, gold.len());
            let (outcome, number) = state.record(index, gold.len(), baseline_score, hybrid_score);

            debug!(
                query_index = index,
                baseline_recall = baseline_score.recall,
                hybrid_recall = hybrid_score.recall,
                ?outcome,
                "scored query"
            );

            on_query(&QueryProgress {
                evaluated: state.evaluated,
                query: &query.query,
                baseline: self.config.baseline,
                top_k: k,
                baseline_mean_recall: state.baseline_mean_recall(),
                hybrid_mean_recall: state.hybrid_mean_recall(),
                baseline_found: baseline_match.found(),
                hybrid_found: hybrid_match.found(),
                outcome,
            });

            match outcome {
                Outcome::Win => transcripts.write_win(&TranscriptRecord {
                    number,
                    query: &query.query,
                    gold: hybrid_match.matched_contents(gold),
                    baseline_results: &baseline_results,
                    hybrid_results: &hybrid_results,
                })?,
                Outcome::Loss => transcripts.write_loss(&TranscriptRecord {
                    number,
                    query: &query.query,
                    gold: baseline_match.matched_contents(gold),
                    baseline_results: &baseline_results,
                    hybrid_results: &hybrid_results,
                })?,
                Outcome::Tie => {}
            }
        }

        info!(
            evaluated = state.evaluated,
            skipped = state.skipped,
            wins = state.wins,
            losses = state.losses,
            ties = state.ties,
            "evaluation finished"
        );
        Ok(state)
    }

    /// Embeds the query, then searches the baseline channel and hybrid in sequence.
    async fn retrieve(
        &self,
        text: &str,
    ) -> Result<(Vec<RetrievedResult>, Vec<RetrievedResult>), EvalError> {
        let embedding = self.embedder.embed(text).await?;
        let dense = ChannelQuery::Dense(embedding);
        let sparse = ChannelQuery::Sparse(text.to_string());
        let k = self.config.top_k;

        let baseline_request = match self.config.baseline {
            Channel::Dense => &dense,
            Channel::Sparse => &sparse,
        };
        let baseline_results = self.backend.search(baseline_request, k).await?;

        // Sparse first: fusion ties break on the earlier channel's rank
        let hybrid_requests = [sparse, dense];
        let hybrid_results = self
            .backend
            .hybrid_search(&hybrid_requests, self.config.ranker, k)
            .await?;

        Ok((baseline_results, hybrid_results))
    }
}

fn channel_score(outcome: &MatchOutcome, gold_total: usize) -> ChannelScore {
    ChannelScore {
        recall: pass_at_k(outcome.found(), gold_total).unwrap_or(0.0),
        reciprocal_rank: reciprocal_rank(outcome),
        found: outcome.found(),
    }
}
