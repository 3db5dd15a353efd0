// file: src/questions/generator.rs
// description: exam question generation over question chunks via the refine fold
// reference: refine summarization chain

use crate::error::Result;
use crate::models::Chunk;
use crate::pipeline::progress::step_bar;
use crate::prompts::{PROMPT_QUESTIONS, REFINE_PROMPT_QUESTIONS};
use crate::providers::ChatModel;
use crate::questions::refine::fold_refine;
use indicatif::ProgressBar;
use std::sync::Arc;
use tracing::{debug, info};

pub struct QuestionGenerator {
    chat: Arc<dyn ChatModel>,
    temperature: f32,
    show_progress: bool,
}

impl QuestionGenerator {
    pub fn new(chat: Arc<dyn ChatModel>, temperature: f32) -> Self {
        Self {
            chat,
            temperature,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Returns the model's newline-delimited question list, or an empty
    /// string when there is nothing to read.
    pub async fn generate(&self, chunks: &[Chunk]) -> Result<String> {
        info!(
            "Generating questions from {} chunks with {}",
            chunks.len(),
            self.chat.model()
        );

        let bar = if self.show_progress {
            step_bar(chunks.len() as u64, "Refining questions")
        } else {
            ProgressBar::hidden()
        };

        let result = fold_refine(
            chunks.iter().map(|c| c.text.as_str()),
            |text| {
                let bar = bar.clone();
                async move {
                    let questions = self.initial_step(text).await;
                    bar.inc(1);
                    questions
                }
            },
            |existing, text| {
                let bar = bar.clone();
                async move {
                    let questions = self.refine_step(&existing, text).await;
                    bar.inc(1);
                    questions
                }
            },
        )
        .await;

        bar.finish_and_clear();
        Ok(result?.unwrap_or_default())
    }

    async fn initial_step(&self, text: &str) -> Result<String> {
        let prompt = PROMPT_QUESTIONS.render(&[("text", text)])?;
        let questions = self.chat.complete(&prompt, self.temperature).await?;
        debug!("Initial step produced {} lines", questions.lines().count());
        Ok(questions)
    }

    async fn refine_step(&self, existing: &str, text: &str) -> Result<String> {
        let prompt =
            REFINE_PROMPT_QUESTIONS.render(&[("existing_answer", existing), ("text", text)])?;
        let questions = self.chat.complete(&prompt, self.temperature).await?;
        debug!("Refine step produced {} lines", questions.lines().count());
        Ok(questions)
    }
}
