// file: src/answers/mod.rs
// description: answer retrieval module exports
// reference: internal module structure

pub mod parser;
pub mod report;
pub mod retrieval;
pub mod retriever;

pub use parser::{QUESTION_LINE, apply_limit, count_questions, parse_questions};
pub use report::ReportWriter;
pub use retrieval::{QaResult, RetrievalQa};
pub use retriever::{AnswerRetriever, AnswerStats};
