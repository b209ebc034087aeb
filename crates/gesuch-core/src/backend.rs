use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    OpenError(String),
    #[error("failed to extract text: {0}")]
    ExtractionError(String),
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for document text extraction backends.
///
/// Implementors turn one container format (PDF, Word, plain text) into plain
/// UTF-8 text. Parsing of the text into sub-projects lives in
/// `gesuch_parsing::StructureExtractor`; format dispatch lives in
/// `gesuch_ingest::FormatRegistry`.
pub trait TextBackend: Send + Sync {
    /// Extract the full text content of a document file.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}
