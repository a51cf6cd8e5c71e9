//! The narrow retrieval interface consumed by the evaluation loop.

use super::collection::ChunkCollection;
use super::fusion::RrfRanker;
use super::types::{Channel, RetrievedResult, SearchError};
use async_trait::async_trait;

/// A request against one retrieval channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelQuery {
    /// Query embedding for the dense field
    Dense(Vec<f32>),
    /// Raw query text for the BM25 field
    Sparse(String),
}

impl ChannelQuery {
    /// Channel this request targets.
    pub fn channel(&self) -> Channel {
        match self {
            ChannelQuery::Dense(_) => Channel::Dense,
            ChannelQuery::Sparse(_) => Channel::Sparse,
        }
    }
}

/// Search backend with a single-channel and a fused hybrid entry point.
///
/// Implementations may be remote (a vector database client) or in-memory
/// ([`ChunkCollection`]). Results are ordered by descending relevance and
/// hold at most `limit` entries.
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Searches one channel.
    async fn search(
        &self,
        query: &ChannelQuery,
        limit: usize,
    ) -> Result<Vec<RetrievedResult>, SearchError>;

    /// Searches every request's channel with `limit`, then fuses the lists
    /// with `ranker` and keeps the top `limit`.
    async fn hybrid_search(
        &self,
        requests: &[ChannelQuery],
        ranker: RrfRanker,
        limit: usize,
    ) -> Result<Vec<RetrievedResult>, SearchError>;
}

#[async_trait]
impl RetrievalBackend for ChunkCollection {
    async fn search(
        &self,
        query: &ChannelQuery,
        limit: usize,
    ) -> Result<Vec<RetrievedResult>, SearchError> {
        self.search_channel(query, limit)
    }

    async fn hybrid_search(
        &self,
        requests: &[ChannelQuery],
        ranker: RrfRanker,
        limit: usize,
    ) -> Result<Vec<RetrievedResult>, SearchError> {
        ChunkCollection::hybrid_search(self, requests, ranker, limit)
    }
}
