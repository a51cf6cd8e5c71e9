//! Corpus loading and the indexing pipeline.
//!
//! - [`corpus`] - parses the chunked corpus JSON
//! - [`pipeline`] - embeds chunks and fills a [`ChunkCollection`](crate::search::ChunkCollection)
//! - [`progress`] - progress reporting for indexing

pub mod corpus;
pub mod pipeline;
pub mod progress;

pub use corpus::{load_corpus, parse_corpus, CorpusChunk, CorpusDocument};
pub use pipeline::{IndexingPipeline, IndexingStats};
pub use progress::IndexingProgress;
