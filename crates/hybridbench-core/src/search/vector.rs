// Exact (flat) inner-product vector search

use super::types::{validate_dimension, ChunkId, SearchError};
use std::cmp::Ordering;
use tracing::instrument;

/// Brute-force vector index scored by inner product.
///
/// Every query is compared against every stored embedding, so recall is exact
/// and results are reproducible. For unit-normalized embeddings the inner
/// product equals cosine similarity.
///
/// Equal scores keep insertion order.
pub struct VectorSearchEngine {
    /// Row-major embedding matrix, `dimension` floats per chunk
    embeddings: Vec<f32>,
    /// Chunk id of each row
    chunk_ids: Vec<ChunkId>,
    /// Dimensionality of embeddings (e.g., 1024 for voyage-2)
    dimension: usize,
}

impl VectorSearchEngine {
    /// Create a new vector search engine
    ///
    /// # Arguments
    /// * `dimension` - Dimensionality of embeddings (must match the model)
    pub fn new(dimension: usize) -> Self {
        Self {
            embeddings: Vec::new(),
            chunk_ids: Vec::new(),
            dimension,
        }
    }

    /// Add a chunk embedding to the index.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::DimensionMismatch` if embedding dimension doesn't match
    /// the engine's configured dimension.
    pub fn add_chunk(&mut self, chunk_id: ChunkId, embedding: &[f32]) -> Result<(), SearchError> {
        validate_dimension(self.dimension, embedding.len())?;
        self.embeddings.extend_from_slice(embedding);
        self.chunk_ids.push(chunk_id);
        Ok(())
    }

    /// Search for the `k` chunks with the highest inner product to `query`.
    ///
    /// Returns `(ChunkId, score)` pairs sorted by score descending.
    #[instrument(skip_all, fields(k, index_size = self.chunk_ids.len()))]
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(ChunkId, f32)>, SearchError> {
        validate_dimension(self.dimension, query.len())?;

        if k == 0 || self.chunk_ids.is_empty() || self.dimension == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .chunks_exact(self.dimension)
            .map(|row| inner_product(row, query))
            .enumerate()
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(row, score)| (self.chunk_ids[row], score))
            .collect())
    }

    /// Number of indexed embeddings.
    pub fn len(&self) -> usize {
        self.chunk_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_ids.is_empty()
    }

    /// Dimensionality this index was created with.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> ChunkId {
        ChunkId::from_u64(n)
    }

    #[test]
    fn test_vector_search_orders_by_inner_product() {
        let mut engine = VectorSearchEngine::new(3);
        engine.add_chunk(id(0), &[1.0, 0.0, 0.0]).unwrap();
        engine.add_chunk(id(1), &[0.0, 1.0, 0.0]).unwrap();
        engine.add_chunk(id(2), &[0.7, 0.7, 0.0]).unwrap();

        let results = engine.search(&[1.0, 0.2, 0.0], 3).unwrap();
        let ids: Vec<u64> = results.iter().map(|(c, _)| c.as_u64()).collect();
        assert_eq!(ids, vec![0, 2, 1]);
        assert!((results[0].1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_vector_search_truncates_to_k() {
        let mut engine = VectorSearchEngine::new(2);
        for n in 0..10 {
            engine.add_chunk(id(n), &[n as f32, 1.0]).unwrap();
        }
        let results = engine.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0.as_u64(), 9);
    }

    #[test]
    fn test_vector_search_ties_keep_insertion_order() {
        let mut engine = VectorSearchEngine::new(2);
        engine.add_chunk(id(5), &[1.0, 0.0]).unwrap();
        engine.add_chunk(id(3), &[1.0, 0.0]).unwrap();
        engine.add_chunk(id(4), &[1.0, 0.0]).unwrap();

        let results = engine.search(&[1.0, 0.0], 3).unwrap();
        let ids: Vec<u64> = results.iter().map(|(c, _)| c.as_u64()).collect();
        assert_eq!(ids, vec![5, 3, 4]);
    }

    #[test]
    fn test_vector_dimension_mismatch() {
        let mut engine = VectorSearchEngine::new(3);
        assert!(matches!(
            engine.add_chunk(id(0), &[1.0, 2.0]),
            Err(SearchError::DimensionMismatch { expected: 3, actual: 2 })
        ));
        assert!(engine.is_empty());
        assert!(engine.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_vector_search_empty_index() {
        let engine = VectorSearchEngine::new(4);
        assert!(engine.search(&[0.0; 4], 5).unwrap().is_empty());
        assert_eq!(engine.dimension(), 4);
    }
}
