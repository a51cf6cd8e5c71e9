//! Gold matching of retrieved results.

use super::dataset::GoldenContent;
use crate::search::types::RetrievedResult;
use serde::{Deserialize, Serialize};

/// How a retrieved result is compared with a gold chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMode {
    /// Trimmed result content equals the trimmed gold content
    #[default]
    Content,
    /// Result `(original_uuid, original_index)` equals the gold reference
    ChunkRef,
}

impl MatchMode {
    fn matches(&self, gold: &GoldenContent, result: &RetrievedResult) -> bool {
        match self {
            MatchMode::Content => result.content.trim() == gold.content,
            MatchMode::ChunkRef => {
                result.original_uuid == gold.doc_uuid && result.original_index == gold.chunk_index
            }
        }
    }
}

/// A gold item found in a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoldHit {
    /// Position of the gold item in the resolved gold list
    pub gold_index: usize,
    /// 1-based rank of the first matching result
    pub rank: usize,
}

/// Gold items recovered by one channel for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Hits in gold order
    pub hits: Vec<GoldHit>,
}

impl MatchOutcome {
    /// Number of gold items found.
    pub fn found(&self) -> usize {
        self.hits.len()
    }

    /// Rank of the best-placed hit.
    pub fn first_hit_rank(&self) -> Option<usize> {
        self.hits.iter().map(|h| h.rank).min()
    }

    /// Contents of the gold items that were found, in gold order.
    pub fn matched_contents<'a>(&self, gold: &'a [GoldenContent]) -> Vec<&'a str> {
        self.hits
            .iter()
            .filter_map(|h| gold.get(h.gold_index).map(|g| g.content.as_str()))
            .collect()
    }
}

/// Matches every gold item against `results[..k]`.
///
/// Each gold item is scanned independently in rank order and counts at most
/// once, at its first matching result. Two identical gold texts can both
/// match the same result.
pub fn match_golden(
    gold: &[GoldenContent],
    results: &[RetrievedResult],
    k: usize,
    mode: MatchMode,
) -> MatchOutcome {
    let window = &results[..k.min(results.len())];
    let hits = gold
        .iter()
        .enumerate()
        .filter_map(|(gold_index, g)| {
            window
                .iter()
                .position(|r| mode.matches(g, r))
                .map(|pos| GoldHit {
                    gold_index,
                    rank: pos + 1,
                })
        })
        .collect();
    MatchOutcome { hits }
}
