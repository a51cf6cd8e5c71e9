//! In-memory chunk collection with a dense and a sparse field.
//!
//! Mirrors the schema of a hybrid vector-database collection: every entity
//! stores the chunk metadata, a dense embedding (flat inner-product index)
//! and its content (BM25 index). Hybrid search fuses the per-field top-K
//! lists with Reciprocal Rank Fusion keyed on the entity id.

use super::backend::ChannelQuery;
use super::fusion::RrfRanker;
use super::keyword::KeywordSearchEngine;
use super::types::{ChunkId, ChunkRecord, RetrievedResult, SearchError};
use super::vector::VectorSearchEngine;
use tracing::{debug, instrument};

pub struct ChunkCollection {
    records: Vec<ChunkRecord>,
    vectors: VectorSearchEngine,
    keywords: KeywordSearchEngine,
}

impl ChunkCollection {
    /// Creates an empty collection for embeddings of `dimension` floats.
    pub fn new(dimension: usize) -> Self {
        Self {
            records: Vec::new(),
            vectors: VectorSearchEngine::new(dimension),
            keywords: KeywordSearchEngine::new(),
        }
    }

    /// Inserts a chunk with its dense embedding and returns the assigned id.
    ///
    /// Ids are assigned sequentially from 0. After a bulk load call
    /// [`refit_sparse`](Self::refit_sparse) so BM25 statistics cover every chunk.
    pub fn insert(&mut self, record: ChunkRecord, embedding: &[f32]) -> Result<ChunkId, SearchError> {
        let id = ChunkId::from_u64(self.records.len() as u64);
        self.vectors.add_chunk(id, embedding)?;
        self.keywords.add_chunk(id, record.content.clone());
        self.records.push(record);
        Ok(id)
    }

    /// Refits the BM25 index to the current corpus.
    pub fn refit_sparse(&mut self) {
        self.keywords.refit();
    }

    pub fn get(&self, id: ChunkId) -> Option<&ChunkRecord> {
        self.records.get(id.as_u64() as usize)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Embedding dimension of the dense field.
    pub fn dimension(&self) -> usize {
        self.vectors.dimension()
    }

    /// Top-`limit` chunks by inner product with `embedding`.
    pub fn search_dense(
        &self,
        embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedResult>, SearchError> {
        let hits = self.vectors.search(embedding, limit)?;
        self.materialize(hits)
    }

    /// Top-`limit` chunks by BM25 score for `text`.
    pub fn search_sparse(&self, text: &str, limit: usize) -> Result<Vec<RetrievedResult>, SearchError> {
        let hits = self.keywords.search(text, limit);
        self.materialize(hits)
    }

    /// Dispatches a request to its channel.
    pub fn search_channel(
        &self,
        query: &ChannelQuery,
        limit: usize,
    ) -> Result<Vec<RetrievedResult>, SearchError> {
        match query {
            ChannelQuery::Dense(embedding) => self.search_dense(embedding, limit),
            ChannelQuery::Sparse(text) => self.search_sparse(text, limit),
        }
    }

    /// Searches each request with `limit`, fuses the lists and keeps the top `limit`.
    ///
    /// Returned scores are fused RRF scores.
    #[instrument(skip_all, fields(channels = requests.len(), limit))]
    pub fn hybrid_search(
        &self,
        requests: &[ChannelQuery],
        ranker: RrfRanker,
        limit: usize,
    ) -> Result<Vec<RetrievedResult>, SearchError> {
        if requests.is_empty() {
            return Err(SearchError::InvalidQuery(
                "hybrid search needs at least one channel request".to_string(),
            ));
        }

        let lists = requests
            .iter()
            .map(|request| self.search_channel(request, limit))
            .collect::<Result<Vec<_>, _>>()?;
        let channels: Vec<&[RetrievedResult]> = lists.iter().map(Vec::as_slice).collect();

        let fused = ranker.fuse(&channels, |result| result.id, limit);
        debug!(fused = fused.len(), "hybrid search fused");

        Ok(fused
            .into_iter()
            .map(|f| RetrievedResult {
                score: f.score as f32,
                ..f.item
            })
            .collect())
    }

    fn materialize(&self, hits: Vec<(ChunkId, f32)>) -> Result<Vec<RetrievedResult>, SearchError> {
        hits.into_iter()
            .map(|(id, score)| {
                self.get(id)
                    .map(|record| RetrievedResult::from_record(id, record, score))
                    .ok_or_else(|| SearchError::IndexError(format!("chunk {} not in collection", id)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::fusion::RRF_K;

    fn record(index: u32, content: &str) -> ChunkRecord {
        ChunkRecord {
            doc_id: "doc_1".to_string(),
            original_uuid: "uuid-1".to_string(),
            chunk_id: format!("doc_1_chunk_{}", index),
            original_index: index,
            content: content.to_string(),
        }
    }

    fn collection() -> ChunkCollection {
        let mut c = ChunkCollection::new(2);
        c.insert(record(0, "parse the config file"), &[1.0, 0.0]).unwrap();
        c.insert(record(1, "open a network socket"), &[0.0, 1.0]).unwrap();
        c.insert(record(2, "config loader with defaults"), &[0.6, 0.8]).unwrap();
        c.refit_sparse();
        c
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let c = collection();
        assert_eq!(c.len(), 3);
        assert_eq!(c.get(ChunkId::from_u64(1)).unwrap().original_index, 1);
        assert!(c.get(ChunkId::from_u64(3)).is_none());
    }

    #[test]
    fn test_insert_rejects_wrong_dimension() {
        let mut c = ChunkCollection::new(2);
        assert!(c.insert(record(0, "x"), &[1.0]).is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn test_dense_and_sparse_channels() {
        let c = collection();

        let dense = c.search_dense(&[1.0, 0.0], 2).unwrap();
        assert_eq!(dense[0].original_index, 0);
        assert_eq!(dense[1].original_index, 2);

        let sparse = c.search_sparse("config", 5).unwrap();
        let indices: Vec<u32> = sparse.iter().map(|r| r.original_index).collect();
        assert_eq!(indices.len(), 2);
        assert!(indices.contains(&0) && indices.contains(&2));
    }

    #[test]
    fn test_hybrid_search_fuses_channels() {
        let c = collection();
        let requests = [
            ChannelQuery::Dense(vec![0.0, 1.0]),
            ChannelQuery::Sparse("loader".to_string()),
        ];
        let results = c.hybrid_search(&requests, RrfRanker::default(), 3).unwrap();

        // dense: [1, 2, 0], sparse: [2]
        let indices: Vec<u32> = results.iter().map(|r| r.original_index).collect();
        assert_eq!(indices, vec![2, 1, 0]);
        assert!((results[0].score - (1.0 / 62.0 + 1.0 / 61.0)).abs() < 1e-6);
        let expected_max = 2.0 / (RRF_K as f32 + 1.0);
        assert!(results.iter().all(|r| r.score > 0.0 && r.score <= expected_max));
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_hybrid_search_requires_a_request() {
        let c = collection();
        assert!(matches!(
            c.hybrid_search(&[], RrfRanker::default(), 3),
            Err(SearchError::InvalidQuery(_))
        ));
    }
}
