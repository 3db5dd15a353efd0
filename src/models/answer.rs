// file: src/models/answer.rs
// description: answer record written to the plain-text report
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::fmt;

pub const SEPARATOR: &str = "--------------------------------------------------";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub ordinal: usize,
    pub question: String,
    pub answer: String,
}

impl AnswerRecord {
    pub fn new(ordinal: usize, question: String, answer: String) -> Self {
        Self {
            ordinal,
            question,
            answer,
        }
    }
}

impl fmt::Display for AnswerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Question {}: {}", self.ordinal, self.question)?;
        writeln!(f, "Answer: {}", self.answer)?;
        writeln!(f, "{}", SEPARATOR)?;
        writeln!(f)
    }
}
