//! Corpus indexing pipeline.
//!
//! Flattens corpus documents into chunk records, embeds chunk contents in
//! batches and inserts each chunk with its vector into a [`ChunkCollection`].

use super::corpus::CorpusDocument;
use super::progress::IndexingProgress;
use crate::config::INDEXING_BATCH_SIZE;
use crate::embedding::Embedder;
use crate::error::ProcessingError;
use crate::search::types::ChunkRecord;
use crate::search::ChunkCollection;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Counts reported after indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexingStats {
    pub documents: usize,
    pub chunks: usize,
}

/// Embeds corpus chunks and loads them into a collection.
///
/// # Example
///
/// ```ignore
/// let pipeline = IndexingPipeline::new(Arc::new(HashedTermEmbedder::new(256)?));
/// let docs = load_corpus(Path::new("codebase_chunks.json"))?;
/// let (collection, stats) = pipeline
///     .build_collection(&docs, |p| println!("{:.0}%", p.percent_complete()))
///     .await?;
/// ```
pub struct IndexingPipeline {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl IndexingPipeline {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            batch_size: INDEXING_BATCH_SIZE,
        }
    }

    /// Sets how many chunks are embedded per call (minimum 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Creates a collection sized for the embedder and indexes `documents` into it.
    pub async fn build_collection<F>(
        &self,
        documents: &[CorpusDocument],
        on_progress: F,
    ) -> Result<(ChunkCollection, IndexingStats), ProcessingError>
    where
        F: FnMut(IndexingProgress),
    {
        let mut collection = ChunkCollection::new(self.embedder.embedding_dim());
        let stats = self.index_into(documents, &mut collection, on_progress).await?;
        Ok((collection, stats))
    }

    /// Indexes `documents` into an existing collection.
    ///
    /// Chunks are inserted in corpus order, so collection ids follow document
    /// order then chunk order. The sparse index is refitted once at the end.
    #[instrument(skip_all, fields(documents = documents.len(), model = self.embedder.model_id()))]
    pub async fn index_into<F>(
        &self,
        documents: &[CorpusDocument],
        collection: &mut ChunkCollection,
        mut on_progress: F,
    ) -> Result<IndexingStats, ProcessingError>
    where
        F: FnMut(IndexingProgress),
    {
        let records: Vec<ChunkRecord> = documents.iter().flat_map(|d| d.records()).collect();
        let total = records.len();
        let mut completed = 0;
        on_progress(IndexingProgress::new(completed, total));

        for batch in records.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|r| r.content.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;
            if embeddings.len() != batch.len() {
                return Err(ProcessingError::BatchSizeMismatch {
                    expected: batch.len(),
                    actual: embeddings.len(),
                });
            }

            for (record, embedding) in batch.iter().zip(embeddings.iter()) {
                collection.insert(record.clone(), embedding)?;
            }
            completed += batch.len();
            on_progress(IndexingProgress::new(completed, total));
        }

        collection.refit_sparse();

        let stats = IndexingStats {
            documents: documents.len(),
            chunks: total,
        };
        info!(documents = stats.documents, chunks = stats.chunks, "indexed corpus");
        Ok(stats)
    }
}
