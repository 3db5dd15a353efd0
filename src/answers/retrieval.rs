// file: src/answers/retrieval.rs
// description: retrieval QA: embed the question, stuff top-k chunks into the prompt, ask the chat model
// reference: stuff-style retrieval augmented generation

use crate::error::Result;
use crate::index::VectorIndex;
use crate::models::ScoredChunk;
use crate::prompts::PROMPT_ANSWER;
use crate::providers::{ChatModel, Embedder};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct QaResult {
    pub answer: String,
    pub sources: Vec<ScoredChunk>,
}

pub struct RetrievalQa {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    top_k: usize,
    temperature: f32,
}

impl RetrievalQa {
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        top_k: usize,
        temperature: f32,
    ) -> Self {
        Self {
            index,
            embedder,
            chat,
            top_k,
            temperature,
        }
    }

    pub async fn answer(&self, query: &str) -> Result<QaResult> {
        let sources = self
            .index
            .similarity_search(query, self.embedder.as_ref(), self.top_k)
            .await?;

        debug!(
            "Retrieved {} chunks for query (best score {:.4})",
            sources.len(),
            sources.first().map(|s| s.score).unwrap_or(0.0)
        );
        for source in &sources {
            debug!("{}", source.format_summary(80));
        }

        let context = stuff_context(&sources);
        let prompt = PROMPT_ANSWER.render(&[("context", context.as_str()), ("question", query)])?;
        let answer = self.chat.complete(&prompt, self.temperature).await?;

        Ok(QaResult { answer, sources })
    }
}

pub fn stuff_context(sources: &[ScoredChunk]) -> String {
    sources
        .iter()
        .map(|s| s.text())
        .collect::<Vec<_>>()
        .join("\n\n")
}
