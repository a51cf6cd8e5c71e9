//! Labeled evaluation set.
//!
//! JSONL, one query per line:
//!
//! ```json
//! {"query": "...",
//!  "golden_chunk_uuids": [["<doc uuid>", 0], ["<doc uuid>", 3]],
//!  "golden_documents": [{"uuid": "<doc uuid>", "chunks": [{"index": 0, "content": "..."}]}]}
//! ```
//!
//! Unknown fields are ignored. Every line is parsed before evaluation starts,
//! so a malformed record fails the run before any query is issued.

use crate::error::DatasetError;
use serde::Deserialize;
use std::io::BufRead;
use std::path::Path;

/// One labeled query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EvaluationQuery {
    pub query: String,
    /// Ordered gold references, resolved against `golden_documents`
    #[serde(rename = "golden_chunk_uuids")]
    pub golden_chunk_refs: Vec<GoldenChunkRef>,
    pub golden_documents: Vec<GoldenDocument>,
}

/// `(document uuid, chunk index)` pair naming a gold chunk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoldenChunkRef(pub String, pub u32);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoldenDocument {
    pub uuid: String,
    pub chunks: Vec<GoldenChunk>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoldenChunk {
    pub index: u32,
    pub content: String,
}

/// A resolved gold chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenContent {
    pub doc_uuid: String,
    pub chunk_index: u32,
    /// Chunk text with surrounding whitespace trimmed
    pub content: String,
}

impl EvaluationQuery {
    /// Resolves gold references in order.
    ///
    /// Each reference takes the first document with a matching uuid and that
    /// document's first chunk with a matching index. References that do not
    /// resolve are dropped, so the result may be shorter than
    /// `golden_chunk_refs` or empty.
    pub fn golden_contents(&self) -> Vec<GoldenContent> {
        self.golden_chunk_refs
            .iter()
            .filter_map(|GoldenChunkRef(uuid, index)| {
                let doc = self.golden_documents.iter().find(|d| &d.uuid == uuid)?;
                let chunk = doc.chunks.iter().find(|c| c.index == *index)?;
                Some(GoldenContent {
                    doc_uuid: uuid.clone(),
                    chunk_index: *index,
                    content: chunk.content.trim().to_string(),
                })
            })
            .collect()
    }
}

/// Reads an evaluation set from a JSONL file.
pub fn load_evaluation_set(path: &Path) -> Result<Vec<EvaluationQuery>, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_evaluation_set(std::io::BufReader::new(file)).map_err(|e| match e {
        DatasetError::Io { source, .. } => DatasetError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parses JSONL records, skipping whitespace-only lines.
///
/// # Errors
///
/// `DatasetError::Parse` with the 1-based line number of the first bad record.
pub fn parse_evaluation_set<R: BufRead>(reader: R) -> Result<Vec<EvaluationQuery>, DatasetError> {
    let mut queries = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| DatasetError::Io {
            path: Default::default(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let query = serde_json::from_str(&line).map_err(|e| DatasetError::Parse {
            line: i + 1,
            message: e.to_string(),
        })?;
        queries.push(query);
    }
    Ok(queries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const RECORD: &str = r#"{"query": "how is the config parsed?", "extra": 1,
        "golden_chunk_uuids": [["u1", 0], ["u1", 2], ["missing", 0], ["u2", 1]],
        "golden_documents": [
            {"uuid": "u1", "content": "whole doc", "chunks": [
                {"index": 0, "content": "  first chunk\n"},
                {"index": 1, "content": "second chunk"}
            ]},
            {"uuid": "u2", "chunks": [{"index": 1, "content": "other doc chunk"}]},
            {"uuid": "u2", "chunks": [{"index": 1, "content": "shadowed duplicate"}]}
        ]}"#;

    fn record() -> EvaluationQuery {
        serde_json::from_str(RECORD).unwrap()
    }

    #[test]
    fn test_golden_contents_resolves_and_trims() {
        let gold = record().golden_contents();
        let contents: Vec<&str> = gold.iter().map(|g| g.content.as_str()).collect();
        // ["u1", 2] and ["missing", 0] do not resolve
        assert_eq!(contents, vec!["first chunk", "other doc chunk"]);
        assert_eq!(gold[1].doc_uuid, "u2");
        assert_eq!(gold[1].chunk_index, 1);
    }

    #[test]
    fn test_golden_contents_all_unresolved() {
        let mut q = record();
        q.golden_chunk_refs = vec![GoldenChunkRef("nope".into(), 9)];
        assert!(q.golden_contents().is_empty());
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let line = RECORD.replace('\n', " ");
        let input = format!("{}\n\n   \n{}\n", line, line);
        let queries = parse_evaluation_set(input.as_bytes()).unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].query, "how is the config parsed?");
        assert_eq!(queries[0].golden_chunk_refs.len(), 4);
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let line = RECORD.replace('\n', " ");
        let input = format!("{}\n{{\"query\": \"no gold\"}}\n", line);
        match parse_evaluation_set(input.as_bytes()) {
            Err(DatasetError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_ref_shape() {
        let input = r#"{"query": "q", "golden_chunk_uuids": [["u1"]], "golden_documents": []}"#;
        assert!(matches!(
            parse_evaluation_set(input.as_bytes()),
            Err(DatasetError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_load_evaluation_set_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", RECORD.replace('\n', " ")).unwrap();
        let queries = load_evaluation_set(file.path()).unwrap();
        assert_eq!(queries.len(), 1);
    }
}
