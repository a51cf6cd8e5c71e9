//! Feature-hashing embedder that needs no model or network.
//!
//! Each lower-cased alphanumeric term is hashed to a bucket and a sign; the
//! signed counts are L2-normalized so the inner product behaves like cosine
//! similarity over shared terms. Useful for dry runs and tests, not as a
//! measure of semantic retrieval quality.

use super::traits::Embedder;
use crate::error::EmbeddingError;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub struct HashedTermEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashedTermEmbedder {
    /// Creates an embedder producing vectors of `dimension` floats.
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::InvalidConfig` if `dimension` is zero.
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "hashed embedding dimension must be positive".to_string(),
            ));
        }
        Ok(Self {
            dimension,
            model_id: format!("hashed-terms-{}", dimension),
        })
    }

    /// Embeds one text synchronously.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for term in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            // DefaultHasher::new() uses fixed keys, so buckets are stable across runs
            let mut hasher = DefaultHasher::new();
            term.to_lowercase().hash(&mut hasher);
            let hash = hasher.finish();

            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashedTermEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn embedding_dim(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_hashed_embedding_is_deterministic_and_normalized() {
        let embedder = HashedTermEmbedder::new(64).unwrap();
        let a = embedder.embed_text("Parse the config file");
        let b = embedder.embed_text("parse THE config file");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashed_embedding_empty_text_is_zero() {
        let embedder = HashedTermEmbedder::new(16).unwrap();
        assert!(embedder.embed_text("  ...  ").iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_hashed_embedding_shared_terms_score_higher() {
        let embedder = HashedTermEmbedder::new(256).unwrap();
        let query = embedder.embed_text("tokio runtime spawn");
        let related = embedder.embed_text("spawn a task on the tokio runtime");
        let unrelated = embedder.embed_text("css grid layout margins");
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[test]
    fn test_hashed_rejects_zero_dimension() {
        assert!(matches!(
            HashedTermEmbedder::new(0),
            Err(EmbeddingError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_hashed_embedder_trait() {
        let embedder = HashedTermEmbedder::new(32).unwrap();
        assert_eq!(embedder.model_id(), "hashed-terms-32");

        let batch = embedder
            .embed_batch(&["a b".to_string(), "c".to_string()])
            .await
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(embedder.embed("a b").await.unwrap(), batch[0]);
    }
}
