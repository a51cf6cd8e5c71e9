//! Error types for hybridbench-core.
//!
//! Search errors live next to the search types in [`crate::search::types`];
//! this module covers embedding, dataset loading and the evaluation loop.

use crate::search::types::SearchError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during embedding operations.
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    /// HTTP request could not be sent or completed
    #[error("Embedding request failed: {0}")]
    RequestFailed(String),
    /// Provider answered with a non-success status
    #[error("Embedding API returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },
    /// Response body did not have the expected shape
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),
    /// Invalid configuration (missing key, bad dimension, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Returned vector has the wrong length
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Configured embedding dimension
        expected: usize,
        /// Length of the returned vector
        actual: usize,
    },
}

/// Errors raised while loading the evaluation set or the corpus.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// File could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A JSONL record could not be parsed (1-based line number)
    #[error("Malformed record on line {line}: {message}")]
    Parse {
        /// 1-based line number in the input
        line: usize,
        /// Parser message
        message: String,
    },
    /// Corpus file is not a valid chunk corpus
    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),
}

/// Errors that abort a comparison run.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Query embedding failed
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    /// Baseline or hybrid search failed
    #[error(transparent)]
    Search(#[from] SearchError),
    /// None of the query's gold references resolved to a chunk
    #[error("Query {query_index} has no resolvable golden contents: {query:?}")]
    NoGoldenContents {
        /// 0-based position of the query in the evaluation set
        query_index: usize,
        /// Query text
        query: String,
    },
    /// Writing a transcript record failed
    #[error("Failed to write transcript: {0}")]
    Transcript(#[from] std::io::Error),
    /// Evaluation parameters are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that can occur while indexing a corpus.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Embedding a batch of chunks failed
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    /// Inserting into the collection failed
    #[error(transparent)]
    Search(#[from] SearchError),
    /// Embedder returned a different number of vectors than texts
    #[error("Embedder returned {actual} vectors for {expected} chunks")]
    BatchSizeMismatch {
        /// Texts sent
        expected: usize,
        /// Vectors received
        actual: usize,
    },
}
