// file: src/models/question.rs
// description: generated study question with its run-local ordinal
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based position among the retained question lines.
    pub ordinal: usize,
    /// Question text with the model's own number prefix removed.
    pub text: String,
    /// The trimmed line as the model emitted it.
    pub raw: String,
}

impl Question {
    pub fn new(ordinal: usize, text: String, raw: String) -> Self {
        Self { ordinal, text, raw }
    }
}
