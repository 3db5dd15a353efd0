// file: src/answers/retriever.rs
// description: answers every retained question in order and writes the report
// reference: sequential answer loop with explicit failure policy

use crate::answers::parser::{apply_limit, parse_questions};
use crate::answers::report::ReportWriter;
use crate::answers::retrieval::RetrievalQa;
use crate::config::ErrorPolicy;
use crate::error::Result;
use crate::models::{AnswerRecord, Question};
use crate::pipeline::progress::ProgressTracker;
use crate::utils::OperationTimer;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const SLOW_ANSWER: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerStats {
    pub total: usize,
    pub answered: usize,
    pub failed: usize,
    pub output_path: PathBuf,
}

pub struct AnswerRetriever {
    qa: RetrievalQa,
    output_path: PathBuf,
    on_error: ErrorPolicy,
    show_progress: bool,
}

impl AnswerRetriever {
    pub fn new(qa: RetrievalQa, output_path: &Path, on_error: ErrorPolicy) -> Self {
        Self {
            qa,
            output_path: output_path.to_path_buf(),
            on_error,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Parses the generated question list, applies the limit, and answers.
    pub async fn retrieve_answers(
        &self,
        questions_text: &str,
        limit: Option<usize>,
    ) -> Result<AnswerStats> {
        let questions = apply_limit(parse_questions(questions_text), limit);
        if let Some(limit) = limit {
            info!("Limited to first {} questions", limit);
        }
        self.answer_questions(&questions).await
    }

    pub async fn answer_questions(&self, questions: &[Question]) -> Result<AnswerStats> {
        let mut report = ReportWriter::create(&self.output_path)?;
        let mut tracker = if self.show_progress {
            ProgressTracker::new(questions.len())
        } else {
            ProgressTracker::hidden()
        };

        for question in questions {
            tracker.start_question(question.ordinal, questions.len());
            let timer = OperationTimer::new(&format!("answer question {}", question.ordinal));

            match self.qa.answer(&question.text).await {
                Ok(result) => {
                    report.write_record(&AnswerRecord::new(
                        question.ordinal,
                        question.text.clone(),
                        result.answer,
                    ))?;
                    tracker.inc_answered();
                }
                Err(e) => {
                    tracker.inc_failed();
                    match self.on_error {
                        ErrorPolicy::Abort => {
                            report.flush()?;
                            return Err(e);
                        }
                        ErrorPolicy::Skip => {
                            warn!("Skipping question {}: {}", question.ordinal, e);
                        }
                    }
                }
            }

            timer.warn_if_slow(SLOW_ANSWER, &question.text);
        }

        let written = report.finish()?;
        tracker.finish();

        info!(
            "Wrote {} answers to {} ({} failed)",
            written,
            self.output_path.display(),
            tracker.failed()
        );

        Ok(AnswerStats {
            total: questions.len(),
            answered: tracker.answered(),
            failed: tracker.failed(),
            output_path: self.output_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::index::VectorIndex;
    use crate::models::{Chunk, SEPARATOR};
    use crate::providers::fakes::{LetterEmbedder, ScriptedChat};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::Arc;

    async fn retriever(
        chat: Arc<ScriptedChat>,
        output: &Path,
        on_error: ErrorPolicy,
    ) -> AnswerRetriever {
        let chunks = vec![
            Chunk::answer(0, 0, "Glycolysis splits glucose.".to_string(), 5),
            Chunk::answer(1, 0, "The Krebs cycle releases CO2.".to_string(), 6),
        ];
        let index = VectorIndex::build(&chunks, &LetterEmbedder, 10).await.unwrap();
        let qa = RetrievalQa::new(Arc::new(index), Arc::new(LetterEmbedder), chat, 4, 0.1);
        AnswerRetriever::new(qa, output, on_error)
    }

    fn question_list(n: usize) -> String {
        let mut lines = vec!["Here are your questions:".to_string()];
        lines.extend((1..=n).map(|i| format!("{}. Question {}?", i, i)));
        lines.join("\n")
    }

    fn blocks(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .split(&format!("{}\n\n", SEPARATOR))
            .filter(|b| !b.is_empty())
            .map(|b| b.to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_limit_answers_prefix_only() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("outputs").join("answers.txt");
        let chat = Arc::new(ScriptedChat::constant("An answer."));
        let retriever = retriever(chat.clone(), &output, ErrorPolicy::Abort).await;

        let stats = retriever
            .retrieve_answers(&question_list(10), Some(3))
            .await
            .unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.answered, 3);
        assert_eq!(chat.prompts().len(), 3);

        let blocks = blocks(&output);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], "Question 1: Question 1?\nAnswer: An answer.\n");
        assert!(blocks[2].starts_with("Question 3: Question 3?"));
    }

    #[tokio::test]
    async fn test_no_questions_writes_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("answers.txt");
        let chat = Arc::new(ScriptedChat::constant("unused"));
        let retriever = retriever(chat.clone(), &output, ErrorPolicy::Abort).await;

        let stats = retriever
            .retrieve_answers("Sorry, I cannot help with that.", None)
            .await
            .unwrap();

        assert_eq!(stats.total, 0);
        assert!(chat.prompts().is_empty());
        assert_eq!(fs::read_to_string(&output).unwrap(), "");
    }

    #[tokio::test]
    async fn test_abort_policy_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("answers.txt");
        let chat = Arc::new(ScriptedChat::new(vec![
            Ok("first".to_string()),
            Err(PipelineError::Provider("quota exceeded".to_string())),
            Ok("third".to_string()),
        ]));
        let retriever = retriever(chat.clone(), &output, ErrorPolicy::Abort).await;

        let err = retriever
            .retrieve_answers(&question_list(3), None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Provider(_)));
        assert_eq!(chat.prompts().len(), 2);
        assert_eq!(blocks(&output).len(), 1);
    }

    #[tokio::test]
    async fn test_skip_policy_continues() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("answers.txt");
        let chat = Arc::new(ScriptedChat::new(vec![
            Ok("first".to_string()),
            Err(PipelineError::Provider("quota exceeded".to_string())),
            Ok("third".to_string()),
        ]));
        let retriever = retriever(chat, &output, ErrorPolicy::Skip).await;

        let stats = retriever
            .retrieve_answers(&question_list(3), None)
            .await
            .unwrap();

        assert_eq!((stats.answered, stats.failed), (2, 1));
        let blocks = blocks(&output);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].starts_with("Question 3: Question 3?\nAnswer: third"));
    }

    #[tokio::test]
    async fn test_rerun_keeps_ordinals_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("answers.txt");
        let questions = "1. Why glucose?\n1. Why CO2?\n7. Why ATP?";

        let first = retriever(Arc::new(ScriptedChat::constant("one")), &output, ErrorPolicy::Abort).await;
        first.retrieve_answers(questions, None).await.unwrap();
        let run_one: Vec<String> = blocks(&output)
            .iter()
            .map(|b| b.lines().next().unwrap().to_string())
            .collect();

        let second = retriever(Arc::new(ScriptedChat::constant("two")), &output, ErrorPolicy::Abort).await;
        second.retrieve_answers(questions, None).await.unwrap();
        let run_two: Vec<String> = blocks(&output)
            .iter()
            .map(|b| b.lines().next().unwrap().to_string())
            .collect();

        assert_eq!(run_one, run_two);
        assert_eq!(
            run_one,
            vec![
                "Question 1: Why glucose?",
                "Question 2: Why CO2?",
                "Question 3: Why ATP?"
            ]
        );
    }
}
