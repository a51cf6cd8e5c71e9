//! Progress tracking types for indexing operations.

/// Progress of a corpus indexing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexingProgress {
    /// Number of chunks embedded and inserted so far
    pub chunks_completed: usize,
    /// Total number of chunks to index
    pub chunks_total: usize,
}

impl IndexingProgress {
    pub fn new(chunks_completed: usize, chunks_total: usize) -> Self {
        Self {
            chunks_completed,
            chunks_total,
        }
    }

    /// Returns the completion percentage (0.0 to 100.0).
    pub fn percent_complete(&self) -> f64 {
        if self.chunks_total == 0 {
            0.0
        } else {
            (self.chunks_completed as f64 / self.chunks_total as f64) * 100.0
        }
    }

    /// Returns true if processing is complete.
    pub fn is_complete(&self) -> bool {
        self.chunks_completed >= self.chunks_total
    }
}
