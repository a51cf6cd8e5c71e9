//! Embedding abstractions and implementations.
//!
//! - [`Embedder`] - async trait for turning text into dense vectors
//! - [`VoyageEmbedder`] - Voyage AI REST client
//! - [`HashedTermEmbedder`] - deterministic offline embedder for tests and dry runs

pub mod hashed;
pub mod traits;
pub mod voyage;

pub use hashed::HashedTermEmbedder;
pub use traits::Embedder;
pub use voyage::{VoyageConfig, VoyageEmbedder};
