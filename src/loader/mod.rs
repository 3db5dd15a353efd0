// file: src/loader/mod.rs
// description: pdf loading and two-level token splitting into question and answer chunks
// reference: internal module structure

pub mod pdf;
pub mod splitter;

pub use pdf::{PageText, PdfLoader};
pub use splitter::{TokenSpan, TokenTextSplitter};

use crate::config::SplitterConfig;
use crate::error::Result;
use crate::models::Chunk;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SplitDocument {
    pub question_chunks: Vec<Chunk>,
    pub answer_chunks: Vec<Chunk>,
    pub page_count: usize,
}

pub struct DocumentSplitter {
    question_splitter: TokenTextSplitter,
    answer_splitter: TokenTextSplitter,
}

impl DocumentSplitter {
    pub fn new(config: &SplitterConfig) -> Result<Self> {
        Ok(Self {
            question_splitter: TokenTextSplitter::new(
                &config.model_name,
                config.chunk_size_q,
                config.chunk_overlap_q,
            )?,
            answer_splitter: TokenTextSplitter::new(
                &config.model_name,
                config.chunk_size_a,
                config.chunk_overlap_a,
            )?,
        })
    }

    pub fn split_question_chunks(&self, text: &str) -> Vec<Chunk> {
        self.question_splitter
            .split_spans(text)
            .into_iter()
            .enumerate()
            .map(|(ordinal, span)| Chunk::question(ordinal, span.text, span.token_count))
            .collect()
    }

    /// Re-splits question chunks; answer chunks never straddle two parents.
    pub fn split_answer_chunks(&self, question_chunks: &[Chunk]) -> Vec<Chunk> {
        let mut answer_chunks = Vec::new();
        for parent in question_chunks {
            for span in self.answer_splitter.split_spans(&parent.text) {
                let ordinal = answer_chunks.len();
                answer_chunks.push(Chunk::answer(
                    ordinal,
                    parent.metadata.ordinal,
                    span.text,
                    span.token_count,
                ));
            }
        }
        answer_chunks
    }

    pub fn split(&self, text: &str) -> (Vec<Chunk>, Vec<Chunk>) {
        let question_chunks = self.split_question_chunks(text);
        let answer_chunks = self.split_answer_chunks(&question_chunks);
        (question_chunks, answer_chunks)
    }
}

/// Loads a PDF and produces the question and answer chunk populations.
pub fn load_and_split(path: &Path, config: &SplitterConfig) -> Result<SplitDocument> {
    let splitter = DocumentSplitter::new(config)?;
    let (text, page_count) = PdfLoader::new().load_text(path)?;

    info!(
        "Extracted {} characters from {} pages of {}",
        text.len(),
        page_count,
        path.display()
    );

    let (question_chunks, answer_chunks) = splitter.split(&text);

    Ok(SplitDocument {
        question_chunks,
        answer_chunks,
        page_count,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};
    use std::path::Path;

    /// Writes a minimal PDF with one line of Courier text per page.
    pub fn write_pdf(path: &Path, pages: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }
}
