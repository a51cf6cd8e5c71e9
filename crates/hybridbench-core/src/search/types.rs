use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Entity key of a chunk inside a collection.
///
/// Assigned sequentially on insert. This is the identity used by rank fusion;
/// gold matching uses content or `(original_uuid, original_index)` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(u64);

impl ChunkId {
    /// Creates a ChunkId from a raw u64 value.
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw u64 value of this ID.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A corpus chunk as stored in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Corpus document id (e.g. `doc_1`)
    pub doc_id: String,
    /// Document UUID that gold references point at
    pub original_uuid: String,
    /// Corpus chunk id (e.g. `doc_1_chunk_0`)
    pub chunk_id: String,
    /// Position of the chunk inside its document
    pub original_index: u32,
    /// Chunk text
    pub content: String,
}

/// One ranked hit returned by a retrieval channel.
///
/// `score` is channel specific: inner product for dense, BM25 for sparse,
/// fused RRF score for hybrid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedResult {
    /// Collection entity key
    pub id: ChunkId,
    /// Corpus document id
    pub doc_id: String,
    /// Corpus chunk id
    pub chunk_id: String,
    /// Document UUID
    pub original_uuid: String,
    /// Position of the chunk inside its document
    pub original_index: u32,
    /// Chunk text
    pub content: String,
    /// Relevance score, higher is better
    pub score: f32,
}

impl RetrievedResult {
    /// Builds a result from a stored record and a score.
    pub fn from_record(id: ChunkId, record: &ChunkRecord, score: f32) -> Self {
        Self {
            id,
            doc_id: record.doc_id.clone(),
            chunk_id: record.chunk_id.clone(),
            original_uuid: record.original_uuid.clone(),
            original_index: record.original_index,
            content: record.content.clone(),
            score,
        }
    }
}

/// A single retrieval channel that can serve as the evaluation baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Nearest-neighbor search over dense embeddings
    Dense,
    /// BM25 lexical search
    Sparse,
}

impl Channel {
    /// Lower-case label used in transcripts, file names and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Dense => "dense",
            Channel::Sparse => "sparse",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for search operations.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// Backend failed to answer a request
    #[error("Backend error: {0}")]
    BackendError(String),
    /// Index construction or query error
    #[error("Index error: {0}")]
    IndexError(String),
    /// Vector dimension mismatch (expected vs actual)
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected embedding dimension
        expected: usize,
        /// Actual embedding dimension received
        actual: usize,
    },
    /// Invalid search request
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

/// Checks that an embedding has the dimension the index was built with.
pub fn validate_dimension(expected: usize, actual: usize) -> Result<(), SearchError> {
    if expected == actual {
        Ok(())
    } else {
        Err(SearchError::DimensionMismatch { expected, actual })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_roundtrip() {
        let id = ChunkId::from_u64(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_channel_labels() {
        assert_eq!(Channel::Dense.to_string(), "dense");
        assert_eq!(Channel::Sparse.as_str(), "sparse");
        assert_eq!(serde_json::to_string(&Channel::Sparse).unwrap(), "\"sparse\"");
    }

    #[test]
    fn test_validate_dimension() {
        assert!(validate_dimension(4, 4).is_ok());
        match validate_dimension(4, 3) {
            Err(SearchError::DimensionMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (4, 3));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_retrieved_result_from_record() {
        let record = ChunkRecord {
            doc_id: "doc_1".into(),
            original_uuid: "uuid-1".into(),
            chunk_id: "doc_1_chunk_0".into(),
            original_index: 0,
            content: "fn main() {}".into(),
        };
        let result = RetrievedResult::from_record(ChunkId::from_u64(7), &record, 0.5);
        assert_eq!(result.id.as_u64(), 7);
        assert_eq!(result.original_uuid, "uuid-1");
        assert_eq!(result.content, "fn main() {}");
        assert_eq!(result.score, 0.5);
    }
}
