//! Per-query retrieval metrics.
//!
//! # References
//!
//! - Voorhees (1999). "The TREC-8 Question Answering Track Report" (MRR)

use super::matching::MatchOutcome;

/// Pass@K recall: the fraction of gold items recovered in the top K.
///
/// # Formula
///
/// ```text
/// Pass@K = found / gold_total
/// ```
///
/// # Arguments
///
/// * `found` - Number of gold items matched within the top K
/// * `gold_total` - Number of resolved gold items
///
/// # Returns
///
/// `None` when `gold_total` is zero (the metric is undefined), otherwise a
/// value in `[0.0, 1.0]` as long as `found <= gold_total`.
pub fn pass_at_k(found: usize, gold_total: usize) -> Option<f64> {
    if gold_total == 0 {
        return None;
    }
    Some(found as f64 / gold_total as f64)
}

/// Reciprocal rank of the best-placed gold hit, or 0.0 when nothing matched.
pub fn reciprocal_rank(outcome: &MatchOutcome) -> f64 {
    outcome
        .first_hit_rank()
        .map(|rank| 1.0 / rank as f64)
        .unwrap_or(0.0)
}
