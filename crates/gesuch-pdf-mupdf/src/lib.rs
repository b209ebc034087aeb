use std::path::Path;

use mupdf::{Document, TextPageFlags};

use gesuch_core::{BackendError, TextBackend};

/// MuPDF-based implementation of [`TextBackend`] for PDF documents.
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency so
/// that Word and plain-text code paths do not transitively depend on it.
///
/// Text is read block by block and line by line, one output line per PDF
/// line, with pages separated by a blank line. Application forms often put
/// the budget on the line after the sub-project heading, so line structure
/// is kept rather than reflowed.
#[derive(Debug, Clone)]
pub struct MupdfBackend {
    /// Inserted between pages.
    page_separator: String,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self {
            page_separator: "\n".to_string(),
        }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the string inserted between consecutive pages.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }
}

impl TextBackend for MupdfBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::OpenError("invalid path encoding".into()))?;

        let document =
            Document::open(path_str).map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        tracing::debug!(path = %path.display(), pages = pages_text.len(), "pdf text extracted");
        Ok(pages_text.join(&self.page_separator))
    }
}
