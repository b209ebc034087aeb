use std::path::Path;
use std::sync::Arc;

use gesuch_core::{BackendError, TextBackend};

use crate::IngestError;
use crate::docx::WordBackend;

/// Document container formats the pipeline can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Word,
    PlainText,
}

impl DocumentFormat {
    /// Order in which formats are tested against a MIME type.
    pub const PRIORITY: [DocumentFormat; 3] = [Self::Pdf, Self::Word, Self::PlainText];

    /// Whether a declared MIME type (and, for plain text, the file name)
    /// selects this format.
    pub fn matches(self, mime_type: &str, path: &Path) -> bool {
        let mime = mime_type.to_ascii_lowercase();
        match self {
            Self::Pdf => mime.contains("pdf"),
            Self::Word => ["word", "document", "openxmlformats"]
                .iter()
                .any(|needle| mime.contains(needle)),
            Self::PlainText => {
                mime.contains("text")
                    || path
                        .extension()
                        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
            }
        }
    }

    /// The first format in [`PRIORITY`](Self::PRIORITY) selected by the MIME type.
    pub fn detect(mime_type: &str, path: &Path) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|format| format.matches(mime_type, path))
    }
}

/// Reads a file as UTF-8 text, unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextBackend;

impl TextBackend for PlainTextBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Table of text backends keyed by [`DocumentFormat`].
///
/// The MIME type picks a format by [`DocumentFormat::detect`]; the format's
/// registered backend does the work. A MIME type selecting no format, or a
/// format with no registered backend, is [`IngestError::UnsupportedFormat`].
#[derive(Clone, Default)]
pub struct FormatRegistry {
    handlers: Vec<(DocumentFormat, Arc<dyn TextBackend>)>,
}

impl FormatRegistry {
    /// A registry with no backends at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// PDF (when the `pdf` feature is enabled), Word and plain text.
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        #[cfg(feature = "pdf")]
        let registry = registry.register(DocumentFormat::Pdf, gesuch_pdf_mupdf::MupdfBackend::default());
        registry
            .register(DocumentFormat::Word, WordBackend)
            .register(DocumentFormat::PlainText, PlainTextBackend)
    }

    /// Register (or replace) the backend for a format.
    pub fn register(mut self, format: DocumentFormat, backend: impl TextBackend + 'static) -> Self {
        let backend: Arc<dyn TextBackend> = Arc::new(backend);
        match self.handlers.iter_mut().find(|(f, _)| *f == format) {
            Some(slot) => slot.1 = backend,
            None => self.handlers.push((format, backend)),
        }
        self
    }

    /// Formats that currently have a backend.
    pub fn formats(&self) -> Vec<DocumentFormat> {
        self.handlers.iter().map(|(f, _)| *f).collect()
    }

    /// Select the format and backend for a document.
    pub fn handler_for(
        &self,
        mime_type: &str,
        path: &Path,
    ) -> Result<(DocumentFormat, &dyn TextBackend), IngestError> {
        let unsupported = || IngestError::UnsupportedFormat {
            mime_type: mime_type.to_string(),
        };
        let format = DocumentFormat::detect(mime_type, path).ok_or_else(unsupported)?;
        self.handlers
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(f, backend)| (*f, backend.as_ref()))
            .ok_or_else(unsupported)
    }

    /// Extract the text of a document by its declared MIME type.
    pub fn extract_text(&self, path: &Path, mime_type: &str) -> Result<String, IngestError> {
        let (format, backend) = self.handler_for(mime_type, path)?;
        tracing::debug!(path = %path.display(), ?format, mime_type, "extracting text");
        backend.extract_text(path).map_err(|err| match err {
            BackendError::Io(source) => IngestError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => IngestError::Backend(other),
        })
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    #[test]
    fn detect_by_mime_substring() {
        let p = Path::new("upload.bin");
        assert_eq!(DocumentFormat::detect("application/pdf", p), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::detect(DOCX_MIME, p), Some(DocumentFormat::Word));
        assert_eq!(DocumentFormat::detect("application/msword", p), Some(DocumentFormat::Word));
        assert_eq!(DocumentFormat::detect("text/plain", p), Some(DocumentFormat::PlainText));
        assert_eq!(DocumentFormat::detect("image/png", p), None);
    }

    #[test]
    fn txt_extension_selects_plain_text() {
        assert_eq!(
            DocumentFormat::detect("application/octet-stream", Path::new("gesuch.TXT")),
            Some(DocumentFormat::PlainText)
        );
    }

    #[test]
    fn pdf_takes_priority() {
        // Contains both "pdf" and "document"; PDF is checked first.
        assert_eq!(
            DocumentFormat::detect("application/x-pdf-document", Path::new("a")),
            Some(DocumentFormat::Pdf)
        );
    }

    #[test]
    fn mime_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::detect("Application/PDF", Path::new("a")),
            Some(DocumentFormat::Pdf)
        );
    }

    #[test]
    fn unsupported_mime_is_rejected() {
        let registry = FormatRegistry::with_defaults();
        let err = registry
            .extract_text(Path::new("bild.png"), "image/png")
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn unregistered_format_is_unsupported() {
        let registry = FormatRegistry::empty().register(DocumentFormat::PlainText, PlainTextBackend);
        let err = registry
            .extract_text(Path::new("gesuch.docx"), DOCX_MIME)
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn register_replaces_existing_backend() {
        let registry = FormatRegistry::with_defaults().register(DocumentFormat::Word, PlainTextBackend);
        let count = registry
            .formats()
            .into_iter()
            .filter(|f| *f == DocumentFormat::Word)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn plain_text_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gesuch.txt");
        std::fs::write(&path, "TP 1: Leitmedien\r\nCHF 500\n").unwrap();
        let text = FormatRegistry::with_defaults()
            .extract_text(&path, "text/plain")
            .unwrap();
        assert_eq!(text, "TP 1: Leitmedien\r\nCHF 500\n");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fehlt.txt");
        let err = FormatRegistry::with_defaults()
            .extract_text(&path, "text/plain")
            .unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }

    #[test]
    fn invalid_utf8_is_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"Gr\xf6sse").unwrap();
        let err = FormatRegistry::with_defaults()
            .extract_text(&path, "text/plain")
            .unwrap_err();
        assert!(matches!(err, IngestError::Backend(BackendError::Encoding(_))));
    }
}
