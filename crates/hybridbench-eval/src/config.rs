//! Embedder selection and environment resolution for the CLI.
//!
//! The Voyage client reads its API key from `$VOYAGE_API` and, when set, its
//! endpoint from `$VOYAGE_BASE_URL`. The hashed embedder needs no credentials
//! and is meant for offline runs and smoke tests.

use anyhow::{anyhow, Context, Result};
use clap::{Args, ValueEnum};
use hybridbench_core::config::{
    HASHED_EMBEDDING_DIM, VOYAGE_API_KEY_ENV, VOYAGE_BASE_URL_ENV, VOYAGE_DEFAULT_MODEL,
    VOYAGE_EMBEDDING_DIM,
};
use hybridbench_core::embedding::{Embedder, HashedTermEmbedder, VoyageConfig, VoyageEmbedder};
use std::sync::Arc;

/// Output width of Voyage models whose dimension differs from the default.
const VOYAGE_MODEL_DIMENSIONS: &[(&str, usize)] = &[
    ("voyage-code-2", 1536),
    ("voyage-large-2", 1536),
    ("voyage-lite-02-instruct", 1024),
    ("voyage-2", 1024),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbedderKind {
    /// Voyage AI embeddings API
    Voyage,
    /// Local feature-hashing embedder
    Hashed,
}

/// Embedder options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct EmbedderArgs {
    /// Embedding backend for corpus chunks and queries
    #[arg(long, value_enum, default_value = "voyage")]
    pub embedder: EmbedderKind,

    /// Voyage model name
    #[arg(long, default_value = VOYAGE_DEFAULT_MODEL)]
    pub model: String,

    /// Voyage embedding dimension (default: looked up from the model name)
    #[arg(long)]
    pub dimension: Option<usize>,

    /// Vector width of the hashed embedder
    #[arg(long, default_value_t = HASHED_EMBEDDING_DIM)]
    pub hashed_dim: usize,
}

/// Returns the known output dimension of a Voyage model.
pub fn voyage_dimension(model: &str) -> usize {
    VOYAGE_MODEL_DIMENSIONS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, dim)| *dim)
        .unwrap_or(VOYAGE_EMBEDDING_DIM)
}

/// Builds the Voyage client configuration from `lookup`, an environment accessor.
pub fn voyage_config<F>(args: &EmbedderArgs, lookup: F) -> Result<VoyageConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup(VOYAGE_API_KEY_ENV)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            anyhow!(
                "Voyage API key not found. Set ${} or use --embedder hashed.",
                VOYAGE_API_KEY_ENV
            )
        })?;

    let dimension = args.dimension.unwrap_or_else(|| voyage_dimension(&args.model));
    let mut config = VoyageConfig::new(api_key).with_model(args.model.clone(), dimension);
    if let Some(base_url) = lookup(VOYAGE_BASE_URL_ENV) {
        config = config.with_base_url(base_url);
    }
    Ok(config)
}

/// Creates the embedder selected on the command line.
pub fn build_embedder(args: &EmbedderArgs) -> Result<Arc<dyn Embedder>> {
    match args.embedder {
        EmbedderKind::Voyage => {
            let config = voyage_config(args, |name| std::env::var(name).ok())?;
            let embedder =
                VoyageEmbedder::new(config).context("Failed to configure Voyage embedder")?;
            Ok(Arc::new(embedder))
        }
        EmbedderKind::Hashed => {
            let embedder = HashedTermEmbedder::new(args.hashed_dim)
                .context("Failed to configure hashed embedder")?;
            Ok(Arc::new(embedder))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(embedder: EmbedderKind) -> EmbedderArgs {
        EmbedderArgs {
            embedder,
            model: VOYAGE_DEFAULT_MODEL.to_string(),
            dimension: None,
            hashed_dim: 16,
        }
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_voyage_dimension_lookup() {
        assert_eq!(voyage_dimension("voyage-code-2"), 1536);
        assert_eq!(voyage_dimension("voyage-2"), 1024);
        assert_eq!(voyage_dimension("something-new"), VOYAGE_EMBEDDING_DIM);
    }

    #[test]
    fn test_voyage_config_requires_key() {
        let err = voyage_config(&args(EmbedderKind::Voyage), env(&[])).unwrap_err();
        assert!(err.to_string().contains(VOYAGE_API_KEY_ENV));

        let blank = voyage_config(&args(EmbedderKind::Voyage), env(&[(VOYAGE_API_KEY_ENV, "  ")]));
        assert!(blank.is_err());
    }

    #[test]
    fn test_voyage_config_reads_env() {
        let mut a = args(EmbedderKind::Voyage);
        a.model = "voyage-code-2".to_string();
        let config = voyage_config(
            &a,
            env(&[
                (VOYAGE_API_KEY_ENV, "secret"),
                (VOYAGE_BASE_URL_ENV, "http://localhost:9000/"),
            ]),
        )
        .unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.dimension, 1536);
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_dimension_override() {
        let mut a = args(EmbedderKind::Voyage);
        a.dimension = Some(512);
        let config = voyage_config(&a, env(&[(VOYAGE_API_KEY_ENV, "k")])).unwrap();
        assert_eq!(config.dimension, 512);
    }

    #[test]
    fn test_build_hashed_embedder() {
        let embedder = build_embedder(&args(EmbedderKind::Hashed)).unwrap();
        assert_eq!(embedder.embedding_dim(), 16);

        let mut zero = args(EmbedderKind::Hashed);
        zero.hashed_dim = 0;
        assert!(build_embedder(&zero).is_err());
    }
}
