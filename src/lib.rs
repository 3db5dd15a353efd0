// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod answers;
pub mod config;
pub mod error;
pub mod index;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod questions;
pub mod utils;

pub use answers::{AnswerRetriever, AnswerStats, QaResult, ReportWriter, RetrievalQa};
pub use config::{
    AnswersConfig, Config, ErrorPolicy, IndexConfig, InputConfig, ProviderConfig, SplitterConfig,
};
pub use error::{PipelineError, Result};
pub use index::VectorIndex;
pub use loader::{DocumentSplitter, PdfLoader, SplitDocument, TokenTextSplitter, load_and_split};
pub use models::{AnswerRecord, Chunk, ChunkKind, Question, ScoredChunk};
pub use pipeline::{PipelineOrchestrator, PipelineStats, ProgressTracker};
pub use prompts::PromptTemplate;
pub use providers::{ChatModel, Embedder, ProviderKind, ProviderSet};
pub use questions::{QuestionGenerator, fold_refine};
pub use utils::{OperationTimer, Validator};
