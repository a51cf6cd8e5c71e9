//! Running aggregates of a comparison run.

use serde::Serialize;
use std::cmp::Ordering;

/// Result of comparing hybrid against the baseline on one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Hybrid recall above baseline
    Win,
    /// Hybrid recall below baseline
    Loss,
    Tie,
}

impl Outcome {
    pub fn classify(baseline_recall: f64, hybrid_recall: f64) -> Self {
        match hybrid_recall.partial_cmp(&baseline_recall) {
            Some(Ordering::Greater) => Outcome::Win,
            Some(Ordering::Less) => Outcome::Loss,
            _ => Outcome::Tie,
        }
    }
}

/// Cumulative totals for one channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelTotals {
    /// Sum of per-query Pass@K
    pub recall_sum: f64,
    /// Sum of per-query reciprocal rank
    pub reciprocal_rank_sum: f64,
    /// Gold items found across all queries
    pub gold_found: usize,
}

impl ChannelTotals {
    fn add(&mut self, score: &ChannelScore) {
        self.recall_sum += score.recall;
        self.reciprocal_rank_sum += score.reciprocal_rank;
        self.gold_found += score.found;
    }
}

/// One channel's score on one query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelScore {
    pub recall: f64,
    pub reciprocal_rank: f64,
    pub found: usize,
}

/// Both channels' scores on one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryScore {
    /// 0-based position in the evaluation set
    pub query_index: usize,
    pub gold_total: usize,
    pub baseline: ChannelScore,
    pub hybrid: ChannelScore,
    pub outcome: Outcome,
}

/// Aggregates threaded through the evaluation loop.
///
/// Skipped queries never touch the channel totals or the query counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationState {
    /// Queries scored so far
    pub evaluated: usize,
    /// Queries skipped for having no resolvable gold
    pub skipped: usize,
    pub baseline: ChannelTotals,
    pub hybrid: ChannelTotals,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    /// Per-query scores in evaluation order
    pub queries: Vec<QueryScore>,
}

impl EvaluationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scored query and returns the outcome with its record number.
    ///
    /// The record number is the 0-based count of earlier outcomes of the same
    /// kind, used to number transcript entries.
    pub fn record(
        &mut self,
        query_index: usize,
        gold_total: usize,
        baseline: ChannelScore,
        hybrid: ChannelScore,
    ) -> (Outcome, usize) {
        let outcome = Outcome::classify(baseline.recall, hybrid.recall);
        let counter = match outcome {
            Outcome::Win => &mut self.wins,
            Outcome::Loss => &mut self.losses,
            Outcome::Tie => &mut self.ties,
        };
        let record_number = *counter;
        *counter += 1;

        self.baseline.add(&baseline);
        self.hybrid.add(&hybrid);
        self.evaluated += 1;
        self.queries.push(QueryScore {
            query_index,
            gold_total,
            baseline,
            hybrid,
            outcome,
        });
        (outcome, record_number)
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Running mean Pass@K of the baseline channel (0.0 before any query).
    pub fn baseline_mean_recall(&self) -> f64 {
        mean(self.baseline.recall_sum, self.evaluated)
    }

    /// Running mean Pass@K of hybrid search (0.0 before any query).
    pub fn hybrid_mean_recall(&self) -> f64 {
        mean(self.hybrid.recall_sum, self.evaluated)
    }

    pub fn baseline_mrr(&self) -> f64 {
        mean(self.baseline.reciprocal_rank_sum, self.evaluated)
    }

    pub fn hybrid_mrr(&self) -> f64 {
        mean(self.hybrid.reciprocal_rank_sum, self.evaluated)
    }

    /// Per-query recall pairs `(baseline, hybrid)` in evaluation order.
    pub fn recall_pairs(&self) -> (Vec<f64>, Vec<f64>) {
        self.queries
            .iter()
            .map(|q| (q.baseline.recall, q.hybrid.recall))
            .unzip()
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
