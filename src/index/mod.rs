// file: src/index/mod.rs
// description: in-memory vector index over answer chunks with cosine top-k search
// reference: vector similarity search over embedded documents

use crate::error::{PipelineError, Result};
use crate::models::{Chunk, ScoredChunk};
use crate::providers::Embedder;
use std::cmp::Ordering;
use tracing::{debug, info};
use uuid::Uuid;

/// Number of chunks stuffed into an answer prompt when not configured.
pub const DEFAULT_TOP_K: usize = 4;

#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: String,
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
    dimension: usize,
}

impl VectorIndex {
    /// Embeds every chunk, `batch_size` texts per provider call.
    pub async fn build(
        chunks: &[Chunk],
        embedder: &dyn Embedder,
        batch_size: usize,
    ) -> Result<Self> {
        let batch_size = batch_size.max(1);
        let mut index = Self::default();

        for (batch_no, batch) in chunks.chunks(batch_size).enumerate() {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = embedder.embed_documents(&texts).await?;

            if vectors.len() != batch.len() {
                return Err(PipelineError::Provider(format!(
                    "Embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }

            for (chunk, embedding) in batch.iter().zip(vectors) {
                index.insert(chunk.clone(), embedding)?;
            }

            debug!("Embedded batch {} ({} chunks)", batch_no + 1, batch.len());
        }

        info!(
            "Vector index built: {} entries, dimension {}",
            index.len(),
            index.dimension
        );
        Ok(index)
    }

    pub fn insert(&mut self, chunk: Chunk, embedding: Vec<f32>) -> Result<String> {
        if embedding.is_empty() {
            return Err(PipelineError::Provider(
                "Received an empty embedding vector".to_string(),
            ));
        }

        if self.entries.is_empty() {
            self.dimension = embedding.len();
        } else if embedding.len() != self.dimension {
            return Err(PipelineError::Provider(format!(
                "Embedding dimension {} does not match index dimension {}",
                embedding.len(),
                self.dimension
            )));
        }

        let id = Uuid::new_v4().to_string();
        self.entries.push(IndexEntry {
            id: id.clone(),
            chunk,
            embedding,
        });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Best `k` entries by cosine similarity; equal scores keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(query, &e.embedding)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        scored
            .into_iter()
            .take(k)
            .map(|(i, score)| {
                let entry = &self.entries[i];
                ScoredChunk::new(entry.id.clone(), entry.chunk.clone(), score)
            })
            .collect()
    }

    pub async fn similarity_search(
        &self,
        query: &str,
        embedder: &dyn Embedder,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let embedding = embedder.embed_query(query).await?;
        if !self.is_empty() && embedding.len() != self.dimension {
            return Err(PipelineError::Provider(format!(
                "Query embedding dimension {} does not match index dimension {}",
                embedding.len(),
                self.dimension
            )));
        }
        Ok(self.search(&embedding, k))
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
