// file: src/prompts/mod.rs
// description: prompt texts for question generation and retrieval answering
// reference: refine and stuff chain prompt conventions

pub mod template;

pub use template::PromptTemplate;

use lazy_static::lazy_static;

const PROMPT_TEMPLATE_QUESTIONS: &str = "
You are an expert at creating practice questions based on study material.
Your goal is to prepare a student for their exam.
You do this by asking questions about the text below:

------------
{text}
------------

Create questions that will prepare the student for their exam.
Focus on the MOST IMPORTANT and FUNDAMENTAL concepts that appear frequently throughout the document.
Prioritize topics that are mentioned multiple times or take up significant space in the material.

Write each question so that it makes complete sense on its own.
Do NOT include phrases like \"according to the text\", \"as mentioned\", \"in the passage\", or similar references.
The questions should sound like they come directly from an exam or quiz, not from a reading comprehension task.

QUESTIONS:
";

const REFINE_TEMPLATE_QUESTIONS: &str = "
You are an expert at creating practice questions based on study material.
Your goal is to help a student prepare for an exam.

We have some existing questions: {existing_answer}

Now we have additional context from the document:
------------
{text}
------------

Your task:
- Update the existing questions to ensure that all important topics from the entire document are covered.
- Do NOT replace questions from previous chunks unless they are redundant.
- Only add or refine questions to improve coverage.
- Ensure the final set of questions reflects the full document, not just the most recent chunk.

Prioritize questions about:
- Topics that appear frequently throughout the document
- Fundamental concepts that are central to the subject
- Major themes that span multiple sections
- Core principles that students must understand

Do NOT include phrases like \"according to the text\", \"as mentioned\", or \"based on the document\".
Make the questions fully self-contained and natural, as if they appeared in an exam.

Do not use markdown formatting, bullet points, or any other formatting.
Just numbered questions in plain text.

QUESTIONS:
";

const ANSWER_TEMPLATE: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:";

lazy_static! {
    /// First refine step: one chunk in, a numbered question list out.
    pub static ref PROMPT_QUESTIONS: PromptTemplate =
        PromptTemplate::new(PROMPT_TEMPLATE_QUESTIONS, &["text"]);

    /// Later refine steps: running question list plus the next chunk.
    pub static ref REFINE_PROMPT_QUESTIONS: PromptTemplate =
        PromptTemplate::new(REFINE_TEMPLATE_QUESTIONS, &["existing_answer", "text"]);

    pub static ref PROMPT_ANSWER: PromptTemplate =
        PromptTemplate::new(ANSWER_TEMPLATE, &["context", "question"]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt_embeds_chunk() {
        let out = PROMPT_QUESTIONS.render(&[("text", "CHUNK-BODY")]).unwrap();
        assert!(out.contains("------------\nCHUNK-BODY\n------------"));
        assert!(out.contains("according to the text"));
        assert!(out.trim_end().ends_with("reading comprehension task.\n\nQUESTIONS:"));
        assert!(!out.contains("markdown"));
    }

    #[test]
    fn test_refine_prompt_needs_both_inputs() {
        assert!(REFINE_PROMPT_QUESTIONS.render(&[("text", "x")]).is_err());
        let out = REFINE_PROMPT_QUESTIONS
            .render(&[("existing_answer", "1. What is DNA?"), ("text", "RNA notes")])
            .unwrap();
        assert!(out.contains("existing questions: 1. What is DNA?"));
        assert!(out.contains("markdown"));
    }

    #[test]
    fn test_answer_prompt_layout() {
        let out = PROMPT_ANSWER
            .render(&[("context", "ctx-a\n\nctx-b"), ("question", "Why?")])
            .unwrap();
        assert!(out.ends_with("Question: Why?\nHelpful Answer:"));
        assert!(out.contains("ctx-a\n\nctx-b"));
    }
}
