// file: src/models/search_result.rs
// description: Search result model with similarity scores
// reference: Used for vector similarity search results

use crate::models::Chunk;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Index entry ID
    pub id: String,

    pub chunk: Chunk,

    /// Cosine similarity (higher is more similar, -1.0 to 1.0)
    pub score: f32,
}

impl ScoredChunk {
    pub fn new(id: String, chunk: Chunk, score: f32) -> Self {
        Self { id, chunk, score }
    }

    pub fn text(&self) -> &str {
        &self.chunk.text
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let content_preview = Validator::truncate_text(&self.chunk.text, max_content_len);

        format!("Score: {:.4} | chunk {}\n{}\n", self.score, self.chunk.metadata.ordinal, content_preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary() {
        let result = ScoredChunk::new(
            "abc123".to_string(),
            Chunk::answer(7, 1, "This is a very long content that will be truncated".to_string(), 10),
            0.87,
        );

        let summary = result.format_summary(20);
        assert!(summary.contains("0.8700"));
        assert!(summary.contains("chunk 7"));
        assert!(summary.contains("..."));
    }
}
