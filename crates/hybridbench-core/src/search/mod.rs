//! Dense, sparse and hybrid retrieval over an in-memory chunk collection.
//!
//! - [`vector`] - exact inner-product search (dense channel)
//! - [`keyword`] - BM25 search (sparse channel)
//! - [`fusion`] - Reciprocal Rank Fusion of ranked lists
//! - [`collection`] - chunk store combining both channels
//! - [`backend`] - the narrow async interface the evaluation loop consumes

pub mod backend;
pub mod collection;
pub mod fusion;
pub mod keyword;
pub mod types;
pub mod vector;

pub use backend::{ChannelQuery, RetrievalBackend};
pub use collection::ChunkCollection;
pub use fusion::{reciprocal_rank_fusion, FusedResult, RrfRanker, RRF_K};
pub use types::{Channel, ChunkId, ChunkRecord, RetrievedResult, SearchError};
