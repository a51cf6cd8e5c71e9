//! Chunked corpus input.
//!
//! The corpus is a JSON array of documents, each already split into chunks:
//!
//! ```json
//! [{ "doc_id": "doc_1", "original_uuid": "3f2a...", "content": "...",
//!    "chunks": [{ "chunk_id": "doc_1_chunk_0", "original_index": 0, "content": "..." }] }]
//! ```

use crate::error::DatasetError;
use crate::search::types::ChunkRecord;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusDocument {
    pub doc_id: String,
    pub original_uuid: String,
    /// Full document text; not indexed
    #[serde(default)]
    pub content: Option<String>,
    pub chunks: Vec<CorpusChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusChunk {
    pub chunk_id: String,
    pub original_index: u32,
    pub content: String,
}

impl CorpusDocument {
    /// Flattens the document into collection records, one per chunk.
    pub fn records(&self) -> impl Iterator<Item = ChunkRecord> + '_ {
        self.chunks.iter().map(move |chunk| ChunkRecord {
            doc_id: self.doc_id.clone(),
            original_uuid: self.original_uuid.clone(),
            chunk_id: chunk.chunk_id.clone(),
            original_index: chunk.original_index,
            content: chunk.content.clone(),
        })
    }
}

/// Reads and parses a corpus file.
pub fn load_corpus(path: &Path) -> Result<Vec<CorpusDocument>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_corpus(std::io::BufReader::new(file))
}

pub fn parse_corpus<R: Read>(reader: R) -> Result<Vec<CorpusDocument>, DatasetError> {
    serde_json::from_reader(reader).map_err(|e| DatasetError::InvalidCorpus(e.to_string()))
}
