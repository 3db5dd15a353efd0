// file: src/models/chunk.rs
// description: document chunk model shared by question generation and retrieval
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Large span fed to the question generator.
    Question,
    /// Small span cut from a question chunk, embedded for retrieval.
    Answer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub kind: ChunkKind,
    /// Zero-based position within its own population.
    pub ordinal: usize,
    /// Ordinal of the question chunk an answer chunk was cut from.
    pub parent: Option<usize>,
    pub token_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn question(ordinal: usize, text: String, token_count: usize) -> Self {
        Self::new(
            text,
            ChunkMetadata {
                kind: ChunkKind::Question,
                ordinal,
                parent: None,
                token_count,
            },
        )
    }

    pub fn answer(ordinal: usize, parent: usize, text: String, token_count: usize) -> Self {
        Self::new(
            text,
            ChunkMetadata {
                kind: ChunkKind::Answer,
                ordinal,
                parent: Some(parent),
                token_count,
            },
        )
    }

    fn new(text: String, metadata: ChunkMetadata) -> Self {
        let id = Self::compute_id(&text, &metadata);
        Self { id, text, metadata }
    }

    fn compute_id(text: &str, metadata: &ChunkMetadata) -> String {
        let mut hasher = Sha256::new();
        hasher.update(match metadata.kind {
            ChunkKind::Question => b"q",
            ChunkKind::Answer => b"a",
        });
        hasher.update(metadata.ordinal.to_le_bytes());
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn kind(&self) -> ChunkKind {
        self.metadata.kind
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
