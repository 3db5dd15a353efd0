// file: src/pipeline/orchestrator.rs
// description: sequences loading, question generation, indexing and answering
// reference: orchestrates the sequential study workflow

use crate::answers::{AnswerRetriever, AnswerStats, RetrievalQa, count_questions};
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::index::VectorIndex;
use crate::loader::{SplitDocument, load_and_split};
use crate::models::Chunk;
use crate::pipeline::progress::PipelineStats;
use crate::providers::ProviderSet;
use crate::questions::QuestionGenerator;
use crate::utils::logging::{format_phase, format_success, format_warning};
use crate::utils::{OperationTimer, Validator};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

pub const PHASE_INPUT: &str = "reading input";
pub const PHASE_PROVIDERS: &str = "configuring providers";
pub const PHASE_LOAD: &str = "loading documents";
pub const PHASE_QUESTIONS: &str = "generating questions";
pub const PHASE_INDEX: &str = "creating vector store";
pub const PHASE_ANSWERS: &str = "generating answers";

pub struct PipelineOrchestrator {
    config: Config,
    providers: Option<ProviderSet>,
    console: bool,
}

impl PipelineOrchestrator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            providers: None,
            console: true,
        }
    }

    /// Uses already-built providers instead of building them from config.
    pub fn with_providers(mut self, providers: ProviderSet) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Silences phase markers and progress bars.
    pub fn quiet(mut self) -> Self {
        self.console = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load, split, generate, index, answer.
    pub async fn run(&self) -> Result<PipelineStats> {
        let start_time = Instant::now();
        let mut stats = PipelineStats::new();

        let path = self.input_path().map_err(|e| e.in_phase(PHASE_INPUT))?;
        let providers = self
            .providers()
            .map_err(|e| e.in_phase(PHASE_PROVIDERS))?;

        self.phase(1, &format!("Processing file: {}", display_name(path)));

        let document = self.load_documents(path).await?;
        stats.page_count = document.page_count;
        stats.question_chunks = document.question_chunks.len();
        stats.answer_chunks = document.answer_chunks.len();
        self.phase(
            2,
            &format!(
                "Loaded {} question chunks and {} answer chunks",
                stats.question_chunks, stats.answer_chunks
            ),
        );

        let questions_text = self
            .generate_questions(&providers, &document.question_chunks)
            .await?;
        stats.questions_generated = count_questions(&questions_text);
        self.phase(
            3,
            &format!("Generated {} questions", stats.questions_generated),
        );
        if stats.questions_generated == 0 {
            warn!("Model output contained no numbered question lines");
            if self.console {
                println!("{}", format_warning("No numbered questions found; the report will be empty"));
            }
        }

        let index = self
            .build_index(&providers, &document.answer_chunks)
            .await?;
        self.phase(
            4,
            &format!("Vector store created successfully ({} entries)", index.len()),
        );

        let answers = self
            .answer_questions(&providers, index, &questions_text)
            .await?;
        stats.questions_answered = answers.answered;
        stats.questions_failed = answers.failed;
        self.phase(
            5,
            &format!(
                "Answers generated successfully and results saved to {}",
                answers.output_path.display()
            ),
        );

        stats.duration_secs = start_time.elapsed().as_secs();
        if self.console {
            println!("{}", format_success("Done!"));
        }
        Ok(stats)
    }

    /// Phases 1 to 3 only: returns the split document and the raw question list.
    pub async fn generate_only(&self) -> Result<(SplitDocument, String)> {
        let path = self.input_path().map_err(|e| e.in_phase(PHASE_INPUT))?;
        let providers = self
            .providers()
            .map_err(|e| e.in_phase(PHASE_PROVIDERS))?;

        self.phase(1, &format!("Processing file: {}", display_name(path)));
        let document = self.load_documents(path).await?;
        self.phase(
            2,
            &format!(
                "Loaded {} question chunks and {} answer chunks",
                document.question_chunks.len(),
                document.answer_chunks.len()
            ),
        );

        let questions_text = self
            .generate_questions(&providers, &document.question_chunks)
            .await?;
        self.phase(
            3,
            &format!("Generated {} questions", count_questions(&questions_text)),
        );

        Ok((document, questions_text))
    }

    pub fn input_path(&self) -> Result<&Path> {
        let path = self.config.file_path()?;
        Validator::validate_file_path(path)?;
        if Validator::validate_pdf_extension(path).is_err() {
            warn!("{} does not have a .pdf extension", path.display());
        }
        Ok(path)
    }

    fn providers(&self) -> Result<ProviderSet> {
        match &self.providers {
            Some(providers) => Ok(providers.clone()),
            None => ProviderSet::from_config(&self.config.provider),
        }
    }

    pub async fn load_documents(&self, path: &Path) -> Result<SplitDocument> {
        let timer = OperationTimer::new(PHASE_LOAD);
        let owned_path = path.to_path_buf();
        let splitter_config = self.config.splitter.clone();

        let document = tokio::task::spawn_blocking(move || {
            load_and_split(&owned_path, &splitter_config)
        })
        .await
        .map_err(|e| PipelineError::input(path, format!("loader task failed: {}", e)))
        .and_then(|result| result)
        .map_err(|e| e.in_phase(PHASE_LOAD))?;

        if document
            .question_chunks
            .iter()
            .all(|chunk| chunk.text.trim().is_empty())
        {
            return Err(
                PipelineError::input(path, "no extractable text found in document")
                    .in_phase(PHASE_LOAD),
            );
        }

        timer.finish_with_count(document.answer_chunks.len());
        Ok(document)
    }

    async fn generate_questions(&self, providers: &ProviderSet, chunks: &[Chunk]) -> Result<String> {
        let timer = OperationTimer::new(PHASE_QUESTIONS);
        let generator = QuestionGenerator::new(
            Arc::clone(&providers.chat),
            self.config.provider.question_temperature,
        )
        .with_progress(self.console);

        let questions = generator
            .generate(chunks)
            .await
            .map_err(|e| e.in_phase(PHASE_QUESTIONS))?;

        timer.finish();
        Ok(questions)
    }

    async fn build_index(&self, providers: &ProviderSet, chunks: &[Chunk]) -> Result<VectorIndex> {
        let timer = OperationTimer::new(PHASE_INDEX);
        let index = VectorIndex::build(
            chunks,
            providers.embedder.as_ref(),
            self.config.index.batch_size,
        )
        .await
        .map_err(|e| e.in_phase(PHASE_INDEX))?;

        timer.finish_with_count(index.len());
        Ok(index)
    }

    async fn answer_questions(
        &self,
        providers: &ProviderSet,
        index: VectorIndex,
        questions_text: &str,
    ) -> Result<AnswerStats> {
        let timer = OperationTimer::new(PHASE_ANSWERS);
        let qa = RetrievalQa::new(
            Arc::new(index),
            Arc::clone(&providers.embedder),
            Arc::clone(&providers.chat),
            self.config.index.top_k,
            self.config.provider.answer_temperature,
        );

        let retriever = AnswerRetriever::new(
            qa,
            &self.config.answers.output_path,
            self.config.answers.on_error,
        )
        .with_progress(self.console);

        let limit = self.config.input.question_limit;
        if let Some(limit) = limit {
            self.note(&format!("Limited to first {} questions", limit));
        }

        let stats = retriever
            .retrieve_answers(questions_text, limit)
            .await
            .map_err(|e| e.in_phase(PHASE_ANSWERS))?;

        timer.finish_with_count(stats.answered);
        info!("Answered {} of {} questions", stats.answered, stats.total);
        Ok(stats)
    }

    fn phase(&self, step: usize, message: &str) {
        info!("Phase {}: {}", step, message);
        if self.console {
            println!("{}", format_phase(step, message));
        }
    }

    fn note(&self, message: &str) {
        if self.console {
            println!("\t{}", message);
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
