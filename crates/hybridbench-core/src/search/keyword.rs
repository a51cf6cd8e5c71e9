//! BM25 keyword search for the sparse channel.
//!
//! This module wraps the [`bm25`](https://crates.io/crates/bm25) crate. Chunk
//! text is tokenized with English stop-word removal and stemming, the same
//! analyzer the sparse field of a hybrid collection uses.
//!
//! # Corpus statistics
//!
//! BM25 normalizes by the average document length. Upserting into an engine
//! built for a different corpus lets that average drift, so after a bulk load
//! call [`KeywordSearchEngine::refit`] to rebuild the index fitted to the
//! current chunks.
//!
//! # Usage
//!
//! ```ignore
//! use hybridbench_core::search::keyword::KeywordSearchEngine;
//!
//! let mut engine = KeywordSearchEngine::new();
//! engine.add_chunk(ChunkId::from_u64(1), "rust programming language".to_string());
//! engine.add_chunk(ChunkId::from_u64(2), "python scripting language".to_string());
//! engine.refit();
//!
//! // Search returns (ChunkId, score) pairs
//! let results = engine.search("rust", 10);
//! ```

use super::types::ChunkId;
use bm25::{Document, Language, SearchEngineBuilder};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::instrument;

/// BM25-based keyword search engine.
///
/// Results with equal BM25 score are ordered by ascending [`ChunkId`], so
/// repeated searches over the same index return identical rankings.
///
/// # Thread Safety
///
/// This type is **not thread-safe** for writes. For concurrent access, wrap in
/// appropriate synchronization primitives (e.g., `Mutex`).
pub struct KeywordSearchEngine {
    /// BM25 search engine
    search_engine: bm25::SearchEngine<u64>,
    /// Indexed text per chunk, kept for refitting
    texts: BTreeMap<u64, String>,
}

impl KeywordSearchEngine {
    /// Creates a new empty keyword search engine.
    pub fn new() -> Self {
        Self {
            search_engine: build_engine(Vec::new()),
            texts: BTreeMap::new(),
        }
    }

    /// Adds a chunk to the BM25 corpus.
    ///
    /// If a chunk with the same ID already exists, it is replaced (upsert semantics).
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn add_chunk(&mut self, chunk_id: ChunkId, text: String) {
        let doc = Document {
            id: chunk_id.as_u64(),
            contents: text.clone(),
        };
        self.search_engine.upsert(doc);
        self.texts.insert(chunk_id.as_u64(), text);
    }

    /// Rebuilds the index so BM25 length normalization matches the current corpus.
    #[instrument(skip_all, fields(chunks = self.texts.len()))]
    pub fn refit(&mut self) {
        let docs: Vec<Document<u64>> = self
            .texts
            .iter()
            .map(|(&id, text)| Document {
                id,
                contents: text.clone(),
            })
            .collect();
        self.search_engine = build_engine(docs);
    }

    /// Searches for chunks matching the query.
    ///
    /// Returns up to `k` `(ChunkId, score)` pairs sorted by score descending.
    /// Chunks sharing no term with the query are never returned, so the
    /// result may be shorter than `k` or empty.
    pub fn search(&self, query: &str, k: usize) -> Vec<(ChunkId, f32)> {
        if k == 0 {
            return Vec::new();
        }

        // Ask for every match so ties at the cut-off are resolved deterministically
        let mut results: Vec<(ChunkId, f32)> = self
            .search_engine
            .search(query, usize::MAX)
            .into_iter()
            .map(|result| (ChunkId::from_u64(result.document.id), result.score))
            .collect();

        results.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        results.truncate(k);
        results
    }

    /// Returns the number of indexed chunks.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Returns `true` if no chunks have been indexed.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl Default for KeywordSearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn build_engine(docs: Vec<Document<u64>>) -> bm25::SearchEngine<u64> {
    SearchEngineBuilder::<u64>::with_documents(Language::English, docs).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(texts: &[&str]) -> KeywordSearchEngine {
        let mut engine = KeywordSearchEngine::new();
        for (i, text) in texts.iter().enumerate() {
            engine.add_chunk(ChunkId::from_u64(i as u64), text.to_string());
        }
        engine.refit();
        engine
    }

    #[test]
    fn test_keyword_search_basic() {
        let engine = engine_with(&[
            "rust programming language",
            "python scripting language",
            "rust compiler internals",
        ]);

        let results = engine.search("rust", 10);
        assert_eq!(results.len(), 2);
        let ids: Vec<u64> = results.iter().map(|(id, _)| id.as_u64()).collect();
        assert!(ids.contains(&0));
        assert!(ids.contains(&2));
        assert!(results.iter().all(|(_, score)| *score > 0.0));
    }

    #[test]
    fn test_keyword_search_empty_engine() {
        let engine = KeywordSearchEngine::new();
        assert!(engine.is_empty());
        assert!(engine.search("anything", 5).is_empty());
    }

    #[test]
    fn test_keyword_search_no_match() {
        let engine = engine_with(&["alpha beta", "gamma delta"]);
        assert!(engine.search("zeta", 5).is_empty());
    }

    #[test]
    fn test_keyword_search_respects_k() {
        let engine = engine_with(&["token one", "token two", "token three", "token four"]);
        assert_eq!(engine.search("token", 2).len(), 2);
        assert!(engine.search("token", 0).is_empty());
    }

    #[test]
    fn test_keyword_search_ties_ordered_by_id() {
        let engine = engine_with(&["same words here", "same words here", "same words here"]);
        let results = engine.search("words", 3);
        let ids: Vec<u64> = results.iter().map(|(id, _)| id.as_u64()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_keyword_search_stemming() {
        let engine = engine_with(&["the parser is parsing tokens", "vector database"]);
        let results = engine.search("parse", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.as_u64(), 0);
    }

    #[test]
    fn test_keyword_upsert_replaces() {
        let mut engine = engine_with(&["old text"]);
        engine.add_chunk(ChunkId::from_u64(0), "new content".to_string());
        engine.refit();

        assert_eq!(engine.len(), 1);
        assert!(engine.search("old", 5).is_empty());
        assert_eq!(engine.search("content", 5).len(), 1);
    }

    #[test]
    fn test_keyword_scores_sorted_descending() {
        let engine = engine_with(&[
            "cache",
            "cache cache eviction policy",
            "lru cache cache cache",
            "unrelated text",
        ]);
        let results = engine.search("cache", 10);
        for pair in results.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }
}
