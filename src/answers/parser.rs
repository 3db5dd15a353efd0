// file: src/answers/parser.rs
// description: numbered question line filtering and renumbering
// reference: https://docs.rs/regex

use crate::models::Question;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref QUESTION_LINE: Regex =
        Regex::new(r"^\d+\.").expect("QUESTION_LINE regex is valid");

    static ref NUMBER_PREFIX: Regex =
        Regex::new(r"^\d+\.\s*").expect("NUMBER_PREFIX regex is valid");
}

/// Keeps lines that start with digits followed by a period, in order.
///
/// Ordinals are assigned here (1-based), so duplicate or skipped numbers in
/// the model output never reach the report.
pub fn parse_questions(text: &str) -> Vec<Question> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| QUESTION_LINE.is_match(line))
        .enumerate()
        .map(|(i, line)| {
            let clean = NUMBER_PREFIX.replace(line, "").into_owned();
            Question::new(i + 1, clean, line.to_string())
        })
        .collect()
}

pub fn count_questions(text: &str) -> usize {
    text.split('\n')
        .filter(|line| QUESTION_LINE.is_match(line.trim()))
        .count()
}

/// Strict prefix truncation.
pub fn apply_limit(mut questions: Vec<Question>, limit: Option<usize>) -> Vec<Question> {
    if let Some(limit) = limit {
        questions.truncate(limit);
    }
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filters_non_question_lines() {
        let questions = parse_questions("Intro\n1. What is X?\n2. How does Y work?\nFooter");
        let raw: Vec<_> = questions.iter().map(|q| q.raw.as_str()).collect();
        assert_eq!(raw, vec!["1. What is X?", "2. How does Y work?"]);
    }

    #[test]
    fn test_strips_prefix_and_renumbers() {
        let questions = parse_questions("3. First?\n\n  3.Second?\n10.   Third?\r\n- bullet?");
        assert_eq!(questions.len(), 3);
        assert_eq!(
            questions
                .iter()
                .map(|q| (q.ordinal, q.text.as_str()))
                .collect::<Vec<_>>(),
            vec![(1, "First?"), (2, "Second?"), (3, "Third?")]
        );
    }

    #[test]
    fn test_requires_period_after_digits() {
        assert!(parse_questions("1) What?\n2 What?\nQ1. What?").is_empty());
    }

    #[test]
    fn test_count_matches_parse() {
        let text = "QUESTIONS:\n1. A?\n2. B?\n\nnotes";
        assert_eq!(count_questions(text), parse_questions(text).len());
    }

    #[test]
    fn test_limit_is_prefix() {
        let text = (1..=10)
            .map(|i| format!("{}. Question {}?", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        let limited = apply_limit(parse_questions(&text), Some(3));
        assert_eq!(
            limited.iter().map(|q| q.text.as_str()).collect::<Vec<_>>(),
            vec!["Question 1?", "Question 2?", "Question 3?"]
        );
    }

    #[test]
    fn test_limit_none_and_oversized() {
        let questions = parse_questions("1. A?\n2. B?");
        assert_eq!(apply_limit(questions.clone(), None).len(), 2);
        assert_eq!(apply_limit(questions, Some(50)).len(), 2);
    }
}
