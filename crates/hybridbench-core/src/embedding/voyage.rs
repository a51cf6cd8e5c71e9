//! Voyage AI embeddings client.
//!
//! Calls `POST {base_url}/v1/embeddings` with bearer authentication:
//!
//! ```text
//! request:  { "input": ["text", ...], "model": "voyage-2" }
//! response: { "data": [{ "embedding": [..], "index": 0 }, ...], "model": "...", "usage": {..} }
//! ```
//!
//! Inputs are sent in batches of at most [`VOYAGE_MAX_BATCH`] texts. Failed
//! requests are reported as errors, never retried.

use super::traits::Embedder;
use crate::config::{
    VOYAGE_DEFAULT_BASE_URL, VOYAGE_DEFAULT_MODEL, VOYAGE_EMBEDDING_DIM, VOYAGE_MAX_BATCH,
    VOYAGE_TIMEOUT_SECS,
};
use crate::error::EmbeddingError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Shared HTTP client; reqwest pools connections internally.
///
/// A build failure is kept so every [`VoyageEmbedder::new`] reports it.
static HTTP_CLIENT: Lazy<Result<reqwest::Client, String>> = Lazy::new(|| {
    build_http_client(Duration::from_secs(VOYAGE_TIMEOUT_SECS)).map_err(|e| {
        warn!(error = %e, "failed to build HTTP client");
        e.to_string()
    })
});

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(concat!("hybridbench/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
}

/// Connection and model settings for [`VoyageEmbedder`].
#[derive(Debug, Clone)]
pub struct VoyageConfig {
    pub api_key: String,
    pub model: String,
    /// Expected output dimension, checked on every returned vector
    pub dimension: usize,
    /// API root without trailing slash
    pub base_url: String,
    /// Texts per request, clamped to `1..=VOYAGE_MAX_BATCH`
    pub batch_size: usize,
}

impl VoyageConfig {
    /// `voyage-2` against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: VOYAGE_DEFAULT_MODEL.to_string(),
            dimension: VOYAGE_EMBEDDING_DIM,
            base_url: VOYAGE_DEFAULT_BASE_URL.to_string(),
            batch_size: VOYAGE_MAX_BATCH,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>, dimension: usize) -> Self {
        self.model = model.into();
        self.dimension = dimension;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
    index: usize,
}

pub struct VoyageEmbedder {
    config: VoyageConfig,
    client: reqwest::Client,
}

impl VoyageEmbedder {
    /// # Errors
    ///
    /// Returns `EmbeddingError::InvalidConfig` for an empty API key or a zero
    /// dimension, and `EmbeddingError::RequestFailed` if the HTTP client could
    /// not be built.
    pub fn new(config: VoyageConfig) -> Result<Self, EmbeddingError> {
        if config.api_key.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig(
                "Voyage API key is empty".to_string(),
            ));
        }
        if config.dimension == 0 {
            return Err(EmbeddingError::InvalidConfig(
                "embedding dimension must be positive".to_string(),
            ));
        }
        let client = HTTP_CLIENT
            .as_ref()
            .map_err(|e| {
                EmbeddingError::RequestFailed(format!("HTTP client unavailable: {}", e))
            })?
            .clone();
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/embeddings", self.config.base_url)
    }

    #[instrument(skip_all, fields(model = %self.config.model, batch = texts.len()))]
    async fn request_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbedRequest {
            input: texts,
            model: &self.config.model,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        self.collect_embeddings(parsed, texts.len())
    }

    /// Reorders `data` by `index` and validates count and dimension.
    fn collect_embeddings(
        &self,
        mut parsed: EmbedResponse,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if parsed.data.len() != expected {
            return Err(EmbeddingError::InvalidResponse(format!(
                "expected {} embeddings, got {}",
                expected,
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        let mut embeddings = Vec::with_capacity(expected);
        for (position, item) in parsed.data.into_iter().enumerate() {
            if item.index != position {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "missing embedding for input {}",
                    position
                )));
            }
            if item.embedding.len() != self.config.dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.config.dimension,
                    actual: item.embedding.len(),
                });
            }
            embeddings.push(item.embedding);
        }
        Ok(embeddings)
    }
}

#[async_trait]
impl Embedder for VoyageEmbedder {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    fn embedding_dim(&self) -> usize {
        self.config.dimension
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = self.config.batch_size.clamp(1, VOYAGE_MAX_BATCH);
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(batch_size) {
            embeddings.extend(self.request_batch(batch).await?);
        }
        debug!(count = embeddings.len(), "embedded texts");
        Ok(embeddings)
    }
}
