//! Default configuration for hybridbench.
//!
//! These values match the reference evaluation setup: top-5 retrieval,
//! RRF with k=60 and Voyage `voyage-2` embeddings.

/// Number of results retrieved per channel and scored for Pass@K.
pub const DEFAULT_TOP_K: usize = 5;

// Re-exported so callers configure fusion from one place.
pub use crate::search::fusion::RRF_K;

/// Default Voyage embedding model.
pub const VOYAGE_DEFAULT_MODEL: &str = "voyage-2";

/// Output dimension of `voyage-2`.
pub const VOYAGE_EMBEDDING_DIM: usize = 1024;

/// Base URL of the Voyage REST API.
pub const VOYAGE_DEFAULT_BASE_URL: &str = "https://api.voyageai.com";

/// Environment variable holding the Voyage API key.
pub const VOYAGE_API_KEY_ENV: &str = "VOYAGE_API";

/// Environment variable overriding [`VOYAGE_DEFAULT_BASE_URL`].
pub const VOYAGE_BASE_URL_ENV: &str = "VOYAGE_BASE_URL";

/// Maximum number of texts per Voyage embeddings request.
pub const VOYAGE_MAX_BATCH: usize = 128;

/// HTTP timeout for a single embeddings request, in seconds.
pub const VOYAGE_TIMEOUT_SECS: u64 = 60;

/// Dimension of the offline hashed-term embedder.
pub const HASHED_EMBEDDING_DIM: usize = 256;

/// Default evaluation-set file name.
pub const EVALUATION_SET_FILENAME: &str = "evaluation_set.jsonl";

/// Default corpus file name.
pub const CORPUS_FILENAME: &str = "codebase_chunks.json";

/// Batch size used when embedding the corpus during indexing.
pub const INDEXING_BATCH_SIZE: usize = 64;
