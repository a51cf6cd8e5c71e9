// Reciprocal Rank Fusion (RRF) algorithm

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Standard RRF k parameter value from academic literature.
///
/// This constant (60) is the recommended value from the original RRF paper:
/// "Reciprocal Rank Fusion outperforms Condorcet and individual Rank Learning Methods"
/// by Cormack, Clarke, and Buettcher (SIGIR 2009). It is also the default of
/// the vector databases whose hybrid search this crate mirrors.
///
/// Smaller k puts more weight on the top of each list, larger k flattens it.
pub const RRF_K: usize = 60;

/// Fusion parameters for hybrid search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RrfRanker {
    /// Smoothing constant added to every rank
    pub k: usize,
}

impl RrfRanker {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Fuses ranked lists with this ranker's `k`. See [`reciprocal_rank_fusion`].
    pub fn fuse<P, K, F>(&self, channels: &[&[P]], identity: F, limit: usize) -> Vec<FusedResult<P>>
    where
        P: Clone,
        K: Eq + Hash,
        F: Fn(&P) -> K,
    {
        reciprocal_rank_fusion(channels, identity, self.k, limit)
    }
}

impl Default for RrfRanker {
    fn default() -> Self {
        Self { k: RRF_K }
    }
}

/// One entry of a fused ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedResult<P> {
    /// Payload taken from the channel where the item ranked highest
    pub item: P,
    /// Sum of `1 / (k + rank)` over the channels containing the item
    pub score: f64,
}

struct Candidate<P> {
    item: P,
    item_rank: usize,
    ranks: Vec<Option<usize>>,
    score: f64,
}

/// Combine ranked results from multiple channels using RRF.
///
/// RRF Formula: RRF_score(d) = sum_{r} 1 / (k + rank_r(d))
///
/// Where:
/// - d is an item, identified by `identity(item)`
/// - r is a channel (one ranked list)
/// - rank_r(d) is the 1-indexed position of d in channel r (absent = no contribution)
/// - k is a constant (typically 60) to reduce impact of high rankings
///
/// Output is sorted by fused score descending. Equal scores are ordered by
/// rank in the first channel, then the second, and so on; an item missing
/// from a channel sorts after every item present in it. At most `limit`
/// results are returned.
///
/// Each identity is reported once, carrying the payload from the channel
/// where it ranked best (the earlier channel on equal rank). A repeated
/// identity within one channel only counts at its first position.
pub fn reciprocal_rank_fusion<P, K, F>(
    channels: &[&[P]],
    identity: F,
    k: usize,
    limit: usize,
) -> Vec<FusedResult<P>>
where
    P: Clone,
    K: Eq + Hash,
    F: Fn(&P) -> K,
{
    let k_param = k as f64;
    let channel_count = channels.len();

    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut candidates: Vec<Candidate<P>> = Vec::new();

    for (channel, results) in channels.iter().enumerate() {
        for (position, item) in results.iter().enumerate() {
            let rank = position + 1; // 1-indexed
            let key = identity(item);

            let slot = match slots.get(&key) {
                Some(&slot) => slot,
                None => {
                    candidates.push(Candidate {
                        item: item.clone(),
                        item_rank: rank,
                        ranks: vec![None; channel_count],
                        score: 0.0,
                    });
                    slots.insert(key, candidates.len() - 1);
                    candidates.len() - 1
                }
            };

            let candidate = &mut candidates[slot];
            if candidate.ranks[channel].is_some() {
                continue;
            }
            candidate.ranks[channel] = Some(rank);
            candidate.score += 1.0 / (k_param + rank as f64);
            if rank < candidate.item_rank {
                candidate.item = item.clone();
                candidate.item_rank = rank;
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| compare_ranks(&a.ranks, &b.ranks))
    });
    candidates.truncate(limit);

    candidates
        .into_iter()
        .map(|c| FusedResult {
            item: c.item,
            score: c.score,
        })
        .collect()
}

fn compare_ranks(a: &[Option<usize>], b: &[Option<usize>]) -> Ordering {
    let key = |rank: &Option<usize>| rank.unwrap_or(usize::MAX);
    a.iter().map(key).cmp(b.iter().map(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(fused: &[FusedResult<&'static str>]) -> Vec<&'static str> {
        fused.iter().map(|r| r.item).collect()
    }

    fn fuse(a: &[&'static str], b: &[&'static str], k: usize) -> Vec<FusedResult<&'static str>> {
        reciprocal_rank_fusion(&[a, b], |s| *s, k, usize::MAX)
    }

    #[test]
    fn test_rrf() {
        let fused = fuse(&["A", "B", "C"], &["C", "A", "D"], RRF_K);

        // A: rank 1 + rank 2, C: rank 3 + rank 1, B: rank 2 only, D: rank 3 only
        assert_eq!(ids(&fused), vec!["A", "C", "B", "D"]);
        assert!((fused[0].score - (1.0 / 61.0 + 1.0 / 62.0)).abs() < 1e-12);
        assert!((fused[1].score - (1.0 / 63.0 + 1.0 / 61.0)).abs() < 1e-12);
        assert!((fused[2].score - 1.0 / 62.0).abs() < 1e-12);
        assert!((fused[3].score - 1.0 / 63.0).abs() < 1e-12);
    }

    #[test]
    fn test_rrf_empty_inputs() {
        let fused = fuse(&[], &["X", "Y"], RRF_K);
        assert_eq!(ids(&fused), vec!["X", "Y"]);

        let fused = fuse(&["X", "Y"], &[], RRF_K);
        assert_eq!(ids(&fused), vec!["X", "Y"]);
    }

    #[test]
    fn test_rrf_both_empty() {
        assert!(fuse(&[], &[], RRF_K).is_empty());
        let no_channels: &[&[&str]] = &[];
        assert!(reciprocal_rank_fusion(no_channels, |s| *s, RRF_K, 10).is_empty());
    }

    #[test]
    fn test_rrf_self_fusion_doubles_scores() {
        let list = ["A", "B", "C", "D"];
        let fused = fuse(&list, &list, RRF_K);

        assert_eq!(ids(&fused), list.to_vec());
        for (i, result) in fused.iter().enumerate() {
            let expected = 2.0 * (1.0 / (RRF_K as f64 + (i + 1) as f64));
            assert_eq!(result.score, expected);
        }
    }

    #[test]
    fn test_rrf_tie_break_by_first_channel_rank() {
        // B and C both score 1/61 + 1/62 and are tied
        let fused = fuse(&["B", "C"], &["C", "B"], RRF_K);
        assert_eq!(fused[0].score, fused[1].score);
        assert_eq!(ids(&fused), vec!["B", "C"]);
    }

    #[test]
    fn test_rrf_tie_break_absent_sorts_last() {
        // X only in channel 1 at rank 1, Y only in channel 2 at rank 1
        let fused = fuse(&["X"], &["Y"], RRF_K);
        assert_eq!(fused[0].score, fused[1].score);
        assert_eq!(ids(&fused), vec!["X", "Y"]);
    }

    #[test]
    fn test_rrf_truncates_to_limit() {
        let fused = reciprocal_rank_fusion(
            &[&["A", "B", "C"][..], &["C", "A", "D"][..]],
            |s| *s,
            RRF_K,
            2,
        );
        assert_eq!(ids(&fused), vec!["A", "C"]);
    }

    #[test]
    fn test_rrf_limit_above_distinct_count() {
        let fused = reciprocal_rank_fusion(&[&["A", "B"][..], &["B"][..]], |s| *s, RRF_K, 100);
        assert_eq!(fused.len(), 2);
    }

    #[test]
    fn test_rrf_duplicate_within_channel_counts_once() {
        let fused = fuse(&["A", "A", "B"], &[], RRF_K);
        assert_eq!(ids(&fused), vec!["A", "B"]);
        assert_eq!(fused[0].score, 1.0 / 61.0);
        // B keeps its list position (rank 3)
        assert_eq!(fused[1].score, 1.0 / 63.0);
    }

    #[test]
    fn test_rrf_payload_from_best_rank() {
        // Same identity (first char), different payloads per channel
        let dense = [("a", "dense-a"), ("b", "dense-b")];
        let sparse = [("b", "sparse-b"), ("a", "sparse-a")];
        let fused = reciprocal_rank_fusion(&[&dense[..], &sparse[..]], |p| p.0, RRF_K, 10);

        let a = fused.iter().find(|r| r.item.0 == "a").unwrap();
        let b = fused.iter().find(|r| r.item.0 == "b").unwrap();
        assert_eq!(a.item.1, "dense-a");
        assert_eq!(b.item.1, "sparse-b");
    }

    #[test]
    fn test_rrf_payload_tie_prefers_earlier_channel() {
        let dense = [("a", "dense-a")];
        let sparse = [("a", "sparse-a")];
        let fused = reciprocal_rank_fusion(&[&dense[..], &sparse[..]], |p| p.0, RRF_K, 10);
        assert_eq!(fused[0].item.1, "dense-a");
    }

    #[test]
    fn test_rrf_k_parameter_impact() {
        // Small k: rank differences matter more
        let small = fuse(&["A", "B"], &["B", "A"], 1);
        let large = fuse(&["A", "B"], &["B", "A"], 1000);
        assert_eq!(small.len(), 2);
        assert_eq!(large.len(), 2);
        let top_small = 1.0 / 2.0;
        assert!(small[0].score > top_small);
        assert!(large[0].score < 2.0 / 1000.0);
    }

    #[test]
    fn test_ranker_default_uses_rrf_k() {
        assert_eq!(RrfRanker::default().k, RRF_K);
        let fused = RrfRanker::new(60).fuse(&[&["A"][..]], |s| *s, 5);
        assert_eq!(fused[0].score, 1.0 / 61.0);
    }

    proptest! {
        #[test]
        fn prop_rank_one_beats_rank_k(k_const in 0usize..200, len in 2usize..20) {
            // Item at rank 1 in one channel vs item at rank `len` in the other
            let a: Vec<u32> = (0..len as u32).collect();
            let b: Vec<u32> = (100..100 + len as u32).collect();
            let fused = reciprocal_rank_fusion(&[&a[..], &b[..]], |x| *x, k_const, usize::MAX);
            let pos = |id: u32| fused.iter().position(|r| r.item == id).unwrap();
            prop_assert!(pos(a[0]) < pos(b[len - 1]));
            prop_assert!(pos(b[0]) < pos(a[len - 1]));
        }

        #[test]
        fn prop_only_input_items_appear(
            a in proptest::collection::vec(0u8..50, 0..20),
            b in proptest::collection::vec(0u8..50, 0..20),
        ) {
            let fused = reciprocal_rank_fusion(&[&a[..], &b[..]], |x| *x, RRF_K, usize::MAX);
            for r in &fused {
                prop_assert!(a.contains(&r.item) || b.contains(&r.item));
            }
            let mut distinct: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(fused.len(), distinct.len());
            for pair in fused.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}
