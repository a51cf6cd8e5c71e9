//! Traits for embedding operations.

use crate::error::EmbeddingError;
use async_trait::async_trait;

/// Trait for embedding model operations.
///
/// Allows remote providers and local models to be swapped without changing
/// the indexing pipeline or the evaluation loop.
///
/// # Examples
///
/// ```ignore
/// let embedder: Box<dyn Embedder> = Box::new(HashedTermEmbedder::new(256)?);
///
/// let embedding = embedder.embed("open a socket").await?;
/// assert_eq!(embedding.len(), embedder.embedding_dim());
/// ```
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns a model identifier (e.g., "voyage-2").
    fn model_id(&self) -> &str;

    /// Returns the embedding dimension (vector size).
    ///
    /// All embeddings from this model will have this length.
    fn embedding_dim(&self) -> usize;

    /// Embeds several texts, returning one vector per input in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embeds a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("no embedding returned".to_string()))
    }
}
