// file: src/loader/pdf.rs
// description: page-wise text extraction from pdf files
// reference: https://docs.rs/lopdf

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// 1-based page number as stored in the document.
    pub number: u32,
    pub text: String,
}

pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }

    /// Extracts text for every page in page order.
    pub fn load_pages(&self, path: &Path) -> Result<Vec<PageText>> {
        Validator::validate_file_path(path)?;

        let document = Document::load(path)
            .map_err(|e| PipelineError::input(path, format!("not a parseable PDF: {}", e)))?;

        let pages = document.get_pages();
        debug!("PDF {} has {} pages", path.display(), pages.len());

        let mut extracted = Vec::with_capacity(pages.len());
        for number in pages.keys().copied() {
            let text = match document.extract_text(&[number]) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping text of page {}: {}", number, e);
                    String::new()
                }
            };
            extracted.push(PageText { number, text });
        }

        Ok(extracted)
    }

    /// Concatenates page text without separators.
    pub fn load_text(&self, path: &Path) -> Result<(String, usize)> {
        let pages = self.load_pages(path)?;
        let page_count = pages.len();
        Ok((concat_pages(&pages), page_count))
    }
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn concat_pages(pages: &[PageText]) -> String {
    pages.iter().map(|p| p.text.as_str()).collect()
}
