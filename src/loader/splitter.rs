// file: src/loader/splitter.rs
// description: token-window text splitting backed by tiktoken encodings
// reference: https://docs.rs/tiktoken-rs

use crate::error::{PipelineError, Result};
use tiktoken_rs::CoreBPE;
use tracing::debug;

/// A decoded token window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub text: String,
    pub token_count: usize,
}

pub struct TokenTextSplitter {
    bpe: CoreBPE,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TokenTextSplitter {
    pub fn new(model_name: &str, chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(PipelineError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(PipelineError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }

        let bpe = match tiktoken_rs::get_bpe_from_model(model_name) {
            Ok(bpe) => bpe,
            Err(_) => {
                debug!("No tokenizer registered for {}, using cl100k_base", model_name);
                tiktoken_rs::cl100k_base().map_err(|e| {
                    PipelineError::Config(format!("Failed to load tokenizer: {}", e))
                })?
            }
        };

        Ok(Self {
            bpe,
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_spans(text).into_iter().map(|s| s.text).collect()
    }

    /// Windows of `chunk_size` tokens, each starting `chunk_size - chunk_overlap`
    /// tokens after the previous one. The last window ends at the final token.
    pub fn split_spans(&self, text: &str) -> Vec<TokenSpan> {
        let tokens = self.bpe.encode_ordinary(text);
        let stride = self.chunk_size - self.chunk_overlap;
        let mut spans = Vec::new();

        let mut start = 0;
        while start < tokens.len() {
            let end = (start + self.chunk_size).min(tokens.len());
            let window = &tokens[start..end];
            let text = self.decode_window(window);
            if text.is_empty() {
                debug!("Dropping undecodable window at token {}", start);
            } else {
                spans.push(TokenSpan {
                    text,
                    token_count: window.len(),
                });
            }

            if end == tokens.len() {
                break;
            }
            start += stride;
        }

        spans
    }

    // A window edge can cut through a multi-byte character; drop up to three
    // edge tokens until the remainder decodes.
    fn decode_window(&self, window: &[usize]) -> String {
        for trim_end in 0..=3usize {
            for trim_start in 0..=3usize {
                if trim_start + trim_end >= window.len() {
                    break;
                }
                let slice = &window[trim_start..window.len() - trim_end];
                if let Ok(text) = self.bpe.decode(slice.to_vec()) {
                    return text;
                }
            }
        }
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text() -> String {
        (0..400)
            .map(|i| format!("Sentence number {} talks about cellular respiration.", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(TokenTextSplitter::new("gpt-3.5-turbo-16k", 10, 10).is_err());
        assert!(TokenTextSplitter::new("gpt-3.5-turbo-16k", 0, 0).is_err());
    }

    #[test]
    fn test_unknown_model_falls_back() {
        let splitter = TokenTextSplitter::new("some-local-model", 50, 5).unwrap();
        assert!(splitter.count_tokens("hello world") > 0);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let splitter = TokenTextSplitter::new("gpt-3.5-turbo-16k", 50, 5).unwrap();
        assert!(splitter.split_text("").is_empty());
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = TokenTextSplitter::new("gpt-3.5-turbo-16k", 50, 5).unwrap();
        let chunks = splitter.split_text("A short note.");
        assert_eq!(chunks, vec!["A short note.".to_string()]);
    }

    #[test]
    fn test_windows_respect_size_and_cover_text() {
        let splitter = TokenTextSplitter::new("gpt-3.5-turbo-16k", 100, 10).unwrap();
        let text = sample_text();
        let total = splitter.count_tokens(&text);
        let spans = splitter.split_spans(&text);

        assert!(spans.len() > 1);
        assert!(spans.iter().all(|s| s.token_count <= 100));
        assert!(spans.iter().all(|s| text.contains(&s.text)));

        let expected = 1 + (total - 100).div_ceil(90);
        assert_eq!(spans.len(), expected);
    }

    #[test]
    fn test_splitting_is_deterministic() {
        let splitter = TokenTextSplitter::new("gpt-3.5-turbo-16k", 64, 8).unwrap();
        let text = sample_text();
        assert_eq!(splitter.split_text(&text), splitter.split_text(&text));
    }

    #[test]
    fn test_multibyte_text_never_panics() {
        let splitter = TokenTextSplitter::new("gpt-3.5-turbo-16k", 7, 2).unwrap();
        let text = "Die Größe der Zelle ändert sich. 細胞は分裂する。 🧬🧬🧬 ".repeat(20);
        let chunks = splitter.split_text(&text);
        assert!(!chunks.is_empty());
        assert!(chunks.iter().all(|c| !c.is_empty()));
        assert!(chunks.iter().all(|c| text.contains(c.as_str())));
    }

    #[test]
    fn test_tiny_windows_over_multibyte_text_are_never_empty() {
        let text = "🧬細胞🧬ändert🧬".repeat(10);
        for size in 2..12 {
            for overlap in 0..size.min(4) {
                let splitter = TokenTextSplitter::new("gpt-3.5-turbo-16k", size, overlap).unwrap();
                let spans = splitter.split_spans(&text);
                assert!(
                    spans.iter().all(|s| !s.text.is_empty()),
                    "empty span for size {} overlap {}",
                    size,
                    overlap
                );
            }
        }
    }
}
