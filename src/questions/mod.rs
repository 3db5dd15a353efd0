// file: src/questions/mod.rs
// description: question generation module exports
// reference: internal module structure

pub mod generator;
pub mod refine;

pub use generator::QuestionGenerator;
pub use refine::fold_refine;
