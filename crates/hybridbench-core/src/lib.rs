//! # Hybridbench Core
//!
//! Library for comparing single-channel retrieval against hybrid rank fusion.
//!
//! A labeled evaluation set is run query by query against a baseline channel
//! (dense vectors or BM25) and against the Reciprocal Rank Fusion of both
//! channels. Per-query Pass@K recall is aggregated, each query is classified
//! as a win, loss or tie for hybrid, and wins/losses are written to
//! plain-text transcripts for inspection.
//!
//! ## Modules
//!
//! - [`search`] - Chunk collection (flat inner-product + BM25 + RRF fusion)
//! - [`embedding`] - Embedder trait plus Voyage and offline hashed implementations
//! - [`processing`] - Corpus loading and the indexing pipeline
//! - [`evaluation`] - Evaluation set, gold matching, scoring and the comparison loop
//! - [`config`] - Default configuration constants
//! - [`error`] - Error types for embedding, dataset loading and evaluation

pub mod config;
pub mod embedding;
pub mod error;
pub mod evaluation;
pub mod processing;
pub mod search;
