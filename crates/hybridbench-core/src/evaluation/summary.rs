//! Serializable end-of-run summary.

use super::matching::MatchMode;
use super::runner::EvalConfig;
use super::state::EvaluationState;
use super::stats::{paired_ttest, TTestResult};
use crate::search::types::Channel;
use serde::Serialize;

/// Mean scores of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelSummary {
    /// Mean Pass@K
    pub pass_at_k: f64,
    /// Mean reciprocal rank of the first gold hit
    pub mrr: f64,
    /// Gold items found across all queries
    pub gold_found: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub baseline_channel: Channel,
    pub top_k: usize,
    pub rrf_k: usize,
    pub match_mode: MatchMode,
    pub queries_evaluated: usize,
    pub queries_skipped: usize,
    pub baseline: ChannelSummary,
    pub hybrid: ChannelSummary,
    pub hybrid_wins: usize,
    pub hybrid_losses: usize,
    pub ties: usize,
    /// Paired t-test of hybrid vs baseline per-query Pass@K (needs 2+ queries)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significance: Option<TTestResult>,
}

impl EvaluationSummary {
    pub fn from_state(state: &EvaluationState, config: &EvalConfig) -> Self {
        let (baseline_recalls, hybrid_recalls) = state.recall_pairs();
        Self {
            baseline_channel: config.baseline,
            top_k: config.top_k,
            rrf_k: config.ranker.k,
            match_mode: config.match_mode,
            queries_evaluated: state.evaluated,
            queries_skipped: state.skipped,
            baseline: ChannelSummary {
                pass_at_k: state.baseline_mean_recall(),
                mrr: state.baseline_mrr(),
                gold_found: state.baseline.gold_found,
            },
            hybrid: ChannelSummary {
                pass_at_k: state.hybrid_mean_recall(),
                mrr: state.hybrid_mrr(),
                gold_found: state.hybrid.gold_found,
            },
            hybrid_wins: state.wins,
            hybrid_losses: state.losses,
            ties: state.ties,
            significance: paired_ttest(&hybrid_recalls, &baseline_recalls),
        }
    }
}
