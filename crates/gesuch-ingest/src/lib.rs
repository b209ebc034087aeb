use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod docx;
pub mod format;
pub mod pipeline;

// Re-export domain types for convenience
pub use gesuch_core::{DocumentMetadata, ExtractionResult, SubProjectCandidate};
pub use format::{DocumentFormat, FormatRegistry, PlainTextBackend};
pub use docx::WordBackend;
pub use pipeline::DocumentPipeline;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("unsupported format: {mime_type}")]
    UnsupportedFormat { mime_type: String },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("text extraction error: {0}")]
    Backend(#[from] gesuch_core::BackendError),
    #[error("invalid pattern configuration: {0}")]
    Config(#[from] gesuch_parsing::ParsingError),
}

/// Extract plain text from a PDF, Word or text document.
///
/// Dispatches on the declared MIME type:
/// - contains `pdf` → MuPDF (requires `pdf` feature)
/// - contains `word`, `document` or `openxmlformats` → `.docx` reader
/// - contains `text`, or the path ends in `.txt` → UTF-8 read
pub fn extract_text(path: &Path, mime_type: &str) -> Result<String, IngestError> {
    FormatRegistry::with_defaults().extract_text(path, mime_type)
}

/// Run the full pipeline with the built-in pattern catalog.
///
/// Never fails: errors are reported through `success` / `error`.
pub fn extract_document(path: &Path, mime_type: &str) -> ExtractionResult {
    DocumentPipeline::default().extract(path, mime_type)
}
