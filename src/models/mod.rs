// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod answer;
pub mod chunk;
pub mod question;
pub mod search_result;

pub use answer::{AnswerRecord, SEPARATOR};
pub use chunk::{Chunk, ChunkKind, ChunkMetadata};
pub use question::Question;
pub use search_result::ScoredChunk;
